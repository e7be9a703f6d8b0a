use serde::{Deserialize, Serialize};

/// A contraction bounded by flag transitions on the reading stream.
///
/// Boundaries are wall-clock receipt times in epoch milliseconds. Receipt
/// time is used instead of the sensor's own timestamp so durations stay
/// accurate under clock skew between sensor and client; this trades away
/// robustness to slow delivery, which the platform accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractionInterval {
    pub start_ms: i64,
    pub end_ms: Option<i64>,
    pub duration_secs: Option<f64>,
}

impl ContractionInterval {
    pub fn open_at(start_ms: i64) -> Self {
        Self {
            start_ms,
            end_ms: None,
            duration_secs: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_ms.is_none()
    }

    /// End when closed, otherwise the start; trailing-window filters use
    /// this so still-open contractions qualify by their onset.
    pub fn effective_end_ms(&self) -> i64 {
        self.end_ms.unwrap_or(self.start_ms)
    }

    /// Closes the interval. `end >= start` is enforced by clamping, and a
    /// closed interval is never reopened.
    pub(crate) fn close_at(&mut self, end_ms: i64) {
        let end_ms = end_ms.max(self.start_ms);
        self.end_ms = Some(end_ms);
        self.duration_secs = Some((end_ms - self.start_ms) as f64 / 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_computes_exact_duration() {
        let mut interval = ContractionInterval::open_at(10_000);
        interval.close_at(73_500);
        assert_eq!(interval.end_ms, Some(73_500));
        assert_eq!(interval.duration_secs, Some(63.5));
        assert!(!interval.is_open());
    }

    #[test]
    fn close_clamps_end_before_start() {
        let mut interval = ContractionInterval::open_at(10_000);
        interval.close_at(9_000);
        assert_eq!(interval.end_ms, Some(10_000));
        assert_eq!(interval.duration_secs, Some(0.0));
    }

    #[test]
    fn effective_end_falls_back_to_start_while_open() {
        let interval = ContractionInterval::open_at(42);
        assert_eq!(interval.effective_end_ms(), 42);
    }
}
