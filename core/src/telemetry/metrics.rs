use serde::Serialize;
use std::sync::Mutex;

/// Point-in-time view of the pipeline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub readings_ingested: usize,
    pub readings_dropped: usize,
    pub intervals_opened: usize,
    pub intervals_closed: usize,
}

/// Counters shared between the ingest boundary and the session tracker.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_ingested(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.readings_ingested += 1;
        }
    }

    pub fn record_dropped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.readings_dropped += 1;
        }
    }

    pub fn record_opened(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.intervals_opened += 1;
        }
    }

    pub fn record_closed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.intervals_closed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
