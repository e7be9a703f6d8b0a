use crate::feed::ContractionInterval;
use serde::{Deserialize, Serialize};

/// Thresholds for the 5-1-1 labor heuristic: contractions roughly five
/// minutes apart, lasting a minute, sustained for an hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub window_mins: i64,
    pub max_avg_interval_secs: f64,
    pub min_avg_duration_secs: f64,
    /// Minimum contractions in the window before the rule can fire. Not part
    /// of the clinical heuristic; a conservative guard against sparse-data
    /// false positives, kept configurable.
    pub min_contractions: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            window_mins: 60,
            max_avg_interval_secs: 300.0,
            min_avg_duration_secs: 60.0,
            min_contractions: 6,
        }
    }
}

/// Outcome of one 5-1-1 evaluation over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleVerdict {
    /// Fewer than two qualifying contractions. Reported as its own state,
    /// never as `satisfied = false`.
    InsufficientData { qualifying: usize },
    Evaluated {
        satisfied: bool,
        avg_interval_secs: f64,
        avg_duration_secs: f64,
        qualifying: usize,
        message: String,
    },
}

impl RuleVerdict {
    pub fn is_satisfied(&self) -> bool {
        matches!(
            self,
            RuleVerdict::Evaluated {
                satisfied: true,
                ..
            }
        )
    }

    /// Display line for log output and the offline report.
    pub fn summary(&self) -> String {
        match self {
            RuleVerdict::InsufficientData { qualifying } => {
                format!("insufficient data ({} qualifying contractions)", qualifying)
            }
            RuleVerdict::Evaluated { message, .. } => message.clone(),
        }
    }
}

/// Evaluates the 5-1-1 heuristic against the full interval list at `now_ms`.
///
/// Qualifying intervals are those whose end (or start, while still open)
/// falls inside the trailing window. Open intervals contribute to
/// start-to-start spacing but not to the duration average; with no completed
/// durations the average falls back to zero rather than failing.
pub fn evaluate(
    intervals: &[ContractionInterval],
    now_ms: i64,
    config: &RuleConfig,
) -> RuleVerdict {
    let window_start = now_ms - config.window_mins * 60_000;
    let recent: Vec<&ContractionInterval> = intervals
        .iter()
        .filter(|interval| interval.effective_end_ms() >= window_start)
        .collect();

    if recent.len() < 2 {
        return RuleVerdict::InsufficientData {
            qualifying: recent.len(),
        };
    }

    let spacings: Vec<f64> = recent
        .windows(2)
        .map(|pair| (pair[1].start_ms - pair[0].start_ms) as f64 / 1000.0)
        .collect();
    let avg_interval_secs = spacings.iter().sum::<f64>() / spacings.len() as f64;

    let durations: Vec<f64> = recent
        .iter()
        .filter_map(|interval| interval.duration_secs)
        .collect();
    let avg_duration_secs = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    let satisfied = avg_interval_secs <= config.max_avg_interval_secs
        && avg_duration_secs >= config.min_avg_duration_secs
        && recent.len() >= config.min_contractions;

    let message = format!(
        "{} contractions in the last {} min: avg interval {:.1} min, avg duration {:.0} s",
        recent.len(),
        config.window_mins,
        avg_interval_secs / 60.0,
        avg_duration_secs
    );

    RuleVerdict::Evaluated {
        satisfied,
        avg_interval_secs,
        avg_duration_secs,
        qualifying: recent.len(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_700_000_000_000;

    /// Closed intervals with the given start offsets (minutes before now)
    /// and a shared duration.
    fn closed_intervals(start_mins_ago: &[i64], duration_secs: i64) -> Vec<ContractionInterval> {
        let mut intervals: Vec<ContractionInterval> = start_mins_ago
            .iter()
            .map(|mins| {
                let start_ms = NOW_MS - mins * 60_000;
                ContractionInterval {
                    start_ms,
                    end_ms: Some(start_ms + duration_secs * 1_000),
                    duration_secs: Some(duration_secs as f64),
                }
            })
            .collect();
        intervals.sort_by_key(|interval| interval.start_ms);
        intervals
    }

    #[test]
    fn fewer_than_two_qualifying_is_insufficient_data() {
        let config = RuleConfig::default();
        assert_eq!(
            evaluate(&[], NOW_MS, &config),
            RuleVerdict::InsufficientData { qualifying: 0 }
        );

        let one = closed_intervals(&[5], 60);
        let verdict = evaluate(&one, NOW_MS, &config);
        assert_eq!(verdict, RuleVerdict::InsufficientData { qualifying: 1 });
        assert!(!verdict.is_satisfied());
    }

    #[test]
    fn stale_intervals_do_not_qualify() {
        // Both intervals ended more than an hour ago.
        let stale = closed_intervals(&[120, 110], 60);
        let verdict = evaluate(&stale, NOW_MS, &RuleConfig::default());
        assert_eq!(verdict, RuleVerdict::InsufficientData { qualifying: 0 });
    }

    #[test]
    fn six_contractions_five_minutes_apart_satisfy_the_rule() {
        let intervals = closed_intervals(&[25, 20, 15, 10, 5, 0], 60);
        let verdict = evaluate(&intervals, NOW_MS, &RuleConfig::default());
        assert!(verdict.is_satisfied());
        match verdict {
            RuleVerdict::Evaluated {
                avg_interval_secs,
                avg_duration_secs,
                qualifying,
                ..
            } => {
                assert_eq!(avg_interval_secs, 300.0);
                assert_eq!(avg_duration_secs, 60.0);
                assert_eq!(qualifying, 6);
            }
            other => panic!("expected evaluated verdict, got {:?}", other),
        }
    }

    #[test]
    fn ten_minute_spacing_fails_and_is_reported() {
        let intervals = closed_intervals(&[50, 40, 30, 20, 10, 0], 60);
        let verdict = evaluate(&intervals, NOW_MS, &RuleConfig::default());
        assert!(!verdict.is_satisfied());
        match &verdict {
            RuleVerdict::Evaluated {
                satisfied, message, ..
            } => {
                assert!(!satisfied);
                assert!(
                    message.contains("10.0 min"),
                    "message should report the average spacing: {}",
                    message
                );
            }
            other => panic!("expected evaluated verdict, got {:?}", other),
        }
    }

    #[test]
    fn short_durations_fail_the_rule() {
        let intervals = closed_intervals(&[25, 20, 15, 10, 5, 0], 30);
        assert!(!evaluate(&intervals, NOW_MS, &RuleConfig::default()).is_satisfied());
    }

    #[test]
    fn open_interval_counts_for_spacing_but_not_duration() {
        let mut intervals = closed_intervals(&[10, 5], 90);
        intervals.push(ContractionInterval::open_at(NOW_MS - 30_000));

        let verdict = evaluate(&intervals, NOW_MS, &RuleConfig::default());
        match verdict {
            RuleVerdict::Evaluated {
                avg_duration_secs,
                qualifying,
                ..
            } => {
                // Two completed 90 s durations; the open one is excluded.
                assert_eq!(avg_duration_secs, 90.0);
                assert_eq!(qualifying, 3);
            }
            other => panic!("expected evaluated verdict, got {:?}", other),
        }
    }

    #[test]
    fn all_open_intervals_average_zero_duration() {
        let intervals = vec![
            ContractionInterval::open_at(NOW_MS - 600_000),
            ContractionInterval::open_at(NOW_MS - 300_000),
        ];
        match evaluate(&intervals, NOW_MS, &RuleConfig::default()) {
            RuleVerdict::Evaluated {
                satisfied,
                avg_duration_secs,
                ..
            } => {
                assert_eq!(avg_duration_secs, 0.0);
                assert!(!satisfied);
            }
            other => panic!("expected evaluated verdict, got {:?}", other),
        }
    }

    #[test]
    fn sample_size_guard_blocks_sparse_windows() {
        // Tight spacing and long durations, but only three contractions.
        let intervals = closed_intervals(&[8, 4, 0], 90);
        let verdict = evaluate(&intervals, NOW_MS, &RuleConfig::default());
        assert!(!verdict.is_satisfied());

        let relaxed = RuleConfig {
            min_contractions: 3,
            ..Default::default()
        };
        assert!(evaluate(&intervals, NOW_MS, &relaxed).is_satisfied());
    }
}
