use crate::feed::{ContractionInterval, Reading};
use crate::telemetry::log::LogManager;

/// Interval mutation produced by one observed flag transition.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalEvent {
    Opened {
        start_ms: i64,
    },
    Closed {
        start_ms: i64,
        end_ms: i64,
        duration_secs: f64,
    },
}

/// Converts the binary contraction flag on the reading stream into discrete
/// interval open/close events.
///
/// The detector owns the observable interval list for the session. Readings
/// are applied in arrival order; steady-state flags (active while already
/// open, inactive while already closed) are no-ops, so at most one interval
/// is open at any time.
pub struct EdgeDetector {
    intervals: Vec<ContractionInterval>,
    opened: usize,
    closed: usize,
    logger: LogManager,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            opened: 0,
            closed: 0,
            logger: LogManager::new("detector"),
        }
    }

    /// Feeds one raw payload at its arrival time. Malformed payloads are
    /// dropped without touching detector state.
    pub fn ingest(&mut self, payload: &[u8], arrival_ms: i64) -> Option<IntervalEvent> {
        let reading = Reading::parse(payload)?;
        self.observe(reading.is_active(), arrival_ms)
    }

    /// Applies one flag sample at its arrival time (wall-clock receipt, not
    /// the sensor's own timestamp).
    pub fn observe(&mut self, active: bool, arrival_ms: i64) -> Option<IntervalEvent> {
        let open = self
            .intervals
            .last()
            .map(|interval| interval.is_open())
            .unwrap_or(false);

        match (active, open) {
            (true, false) => {
                self.intervals.push(ContractionInterval::open_at(arrival_ms));
                self.opened += 1;
                self.logger
                    .record(&format!("contraction opened at {}", arrival_ms));
                Some(IntervalEvent::Opened {
                    start_ms: arrival_ms,
                })
            }
            (false, true) => {
                // `open` above guarantees the list is non-empty here.
                let interval = self.intervals.last_mut()?;
                interval.close_at(arrival_ms);
                self.closed += 1;
                let start_ms = interval.start_ms;
                let end_ms = interval.effective_end_ms();
                let duration_secs = interval.duration_secs.unwrap_or(0.0);
                self.logger
                    .record(&format!("contraction closed after {:.1} s", duration_secs));
                Some(IntervalEvent::Closed {
                    start_ms,
                    end_ms,
                    duration_secs,
                })
            }
            _ => None,
        }
    }

    pub fn intervals(&self) -> &[ContractionInterval] {
        &self.intervals
    }

    pub fn open_interval(&self) -> Option<&ContractionInterval> {
        self.intervals.last().filter(|interval| interval.is_open())
    }

    pub fn opened_count(&self) -> usize {
        self.opened
    }

    pub fn closed_count(&self) -> usize {
        self.closed
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}
