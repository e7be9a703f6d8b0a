use crate::feed::ContractionRecord;
use crate::stats::median;
use serde::Serialize;

/// Derived statistics over the session's contraction history.
///
/// A pure function of the record list: recomputed from scratch on every
/// update. Histories are hundreds of rows per session, so there is no
/// incremental state to keep consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub last10_count: usize,
    pub last24_count: usize,
    pub median_interval_secs: Option<i64>,
    pub median_duration_secs: Option<i64>,
}

impl StatsSnapshot {
    /// Computes the snapshot at `now_ms`. The evaluation instant is captured
    /// once so every window in the pass agrees on "now".
    pub fn compute(records: &[ContractionRecord], now_ms: i64) -> Self {
        let within = |mins: i64| {
            let cutoff = now_ms - mins * 60_000;
            records
                .iter()
                .filter(|record| record.started_at_ms() >= cutoff)
                .count()
        };

        let mut starts: Vec<i64> = records.iter().map(|r| r.started_at_ms()).collect();
        starts.sort_unstable();
        let intervals: Vec<f64> = starts
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) as f64 / 1000.0)
            .collect();

        let durations: Vec<f64> = records.iter().map(|r| r.duration_seconds).collect();

        Self {
            last10_count: within(10),
            last24_count: within(1440),
            median_interval_secs: median(&intervals).map(|m| m.round() as i64),
            median_duration_secs: median(&durations).map(|m| m.round() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const NOW_MS: i64 = 1_700_000_000_000;

    fn record(mins_ago: i64, duration_seconds: f64) -> ContractionRecord {
        ContractionRecord {
            started_at: Utc.timestamp_millis_opt(NOW_MS - mins_ago * 60_000).unwrap(),
            duration_seconds,
            intensity: None,
            notes: None,
            source: "manual".into(),
        }
    }

    #[test]
    fn empty_history_has_counts_but_no_medians() {
        let snapshot = StatsSnapshot::compute(&[], NOW_MS);
        assert_eq!(snapshot.last10_count, 0);
        assert_eq!(snapshot.last24_count, 0);
        assert_eq!(snapshot.median_interval_secs, None);
        assert_eq!(snapshot.median_duration_secs, None);
    }

    #[test]
    fn single_record_yields_no_interval_median() {
        let snapshot = StatsSnapshot::compute(&[record(3, 45.0)], NOW_MS);
        assert_eq!(snapshot.last10_count, 1);
        assert_eq!(snapshot.median_interval_secs, None);
        assert_eq!(snapshot.median_duration_secs, Some(45));
    }

    #[test]
    fn window_counts_respect_their_cutoffs() {
        let records = vec![
            record(2, 60.0),
            record(8, 50.0),
            record(30, 40.0),
            record(60 * 23, 70.0),
            record(60 * 25, 80.0),
        ];
        let snapshot = StatsSnapshot::compute(&records, NOW_MS);
        assert_eq!(snapshot.last10_count, 2);
        assert_eq!(snapshot.last24_count, 4);
    }

    #[test]
    fn interval_median_uses_sorted_start_differences() {
        // Starts 30, 20, 5 minutes ago; unsorted input on purpose. Gaps are
        // 600 s and 900 s, so the median is 750 s.
        let records = vec![record(5, 60.0), record(30, 60.0), record(20, 60.0)];
        let snapshot = StatsSnapshot::compute(&records, NOW_MS);
        assert_eq!(snapshot.median_interval_secs, Some(750));
    }

    #[test]
    fn duration_median_rounds_to_nearest_second() {
        let records = vec![record(10, 40.0), record(5, 45.5)];
        let snapshot = StatsSnapshot::compute(&records, NOW_MS);
        // Median of 40.0 and 45.5 is 42.75, rounded to 43.
        assert_eq!(snapshot.median_duration_secs, Some(43));
    }
}
