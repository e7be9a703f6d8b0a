use crate::feed::ContractionInterval;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Contraction row in the shape exchanged with the persistence collaborator.
///
/// Only the fields this core consumes are modeled; the collaborator owns the
/// rest of its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractionRecord {
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub source: String,
}

impl ContractionRecord {
    /// Builds a record from a closed interval; `None` while still open.
    pub fn from_interval(interval: &ContractionInterval, source: &str) -> Option<Self> {
        let duration_seconds = interval.duration_secs?;
        let started_at = Utc.timestamp_millis_opt(interval.start_ms).single()?;
        Some(Self {
            started_at,
            duration_seconds,
            intensity: None,
            notes: None,
            source: source.to_string(),
        })
    }

    pub fn started_at_ms(&self) -> i64 {
        self.started_at.timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_closed_interval() {
        let mut interval = ContractionInterval::open_at(1_700_000_000_000);
        interval.close_at(1_700_000_045_000);
        let record = ContractionRecord::from_interval(&interval, "sensor").unwrap();
        assert_eq!(record.duration_seconds, 45.0);
        assert_eq!(record.started_at_ms(), 1_700_000_000_000);
        assert_eq!(record.source, "sensor");
    }

    #[test]
    fn open_interval_yields_no_record() {
        let interval = ContractionInterval::open_at(1_700_000_000_000);
        assert!(ContractionRecord::from_interval(&interval, "sensor").is_none());
    }
}
