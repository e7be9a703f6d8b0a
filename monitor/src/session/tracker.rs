use crate::sink::recorder::RecordSink;
use chrono::Utc;
use log::warn;
use std::sync::{Arc, RwLock};
use std::thread;
use tococore::feed::{ContractionInterval, ContractionRecord, Reading};
use tococore::pipeline::{evaluate, EdgeDetector, IntervalEvent, RuleConfig, RuleVerdict};
use tococore::stats::StatsSnapshot;
use tococore::telemetry::MetricsRecorder;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

/// Session-scoped state behind the bridge: the edge detector, the completed
/// record history, and the heuristic configuration.
///
/// All mutation happens through `observe`, driven by the single consumer
/// thread, so readers on the HTTP side never see a partially applied update.
pub struct SessionTracker {
    detector: EdgeDetector,
    records: Vec<ContractionRecord>,
    rule: RuleConfig,
    metrics: Arc<MetricsRecorder>,
}

impl SessionTracker {
    pub fn new(rule: RuleConfig, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            detector: EdgeDetector::new(),
            records: Vec::new(),
            rule,
            metrics,
        }
    }

    /// Applies one reading at its arrival time; returns the completed record
    /// when this reading closed a contraction.
    pub fn observe(&mut self, reading: &Reading, arrival_ms: i64) -> Option<ContractionRecord> {
        match self.detector.observe(reading.is_active(), arrival_ms)? {
            IntervalEvent::Opened { .. } => {
                self.metrics.record_opened();
                None
            }
            IntervalEvent::Closed { .. } => {
                self.metrics.record_closed();
                let record = self
                    .detector
                    .intervals()
                    .last()
                    .and_then(|interval| ContractionRecord::from_interval(interval, "sensor"));
                if let Some(record) = record.as_ref() {
                    self.records.push(record.clone());
                }
                record
            }
        }
    }

    pub fn intervals(&self) -> &[ContractionInterval] {
        self.detector.intervals()
    }

    pub fn records(&self) -> &[ContractionRecord] {
        &self.records
    }

    pub fn snapshot(&self, now_ms: i64) -> StatsSnapshot {
        StatsSnapshot::compute(&self.records, now_ms)
    }

    pub fn evaluate(&self, now_ms: i64) -> RuleVerdict {
        evaluate(self.detector.intervals(), now_ms, &self.rule)
    }

    /// Runs the one long-lived bus subscription on its own thread, feeding
    /// readings to the tracker in arrival order and forwarding each completed
    /// contraction to the sink. Ends when the bus closes.
    pub fn spawn_consumer(
        tracker: Arc<RwLock<Self>>,
        mut rx: Receiver<Reading>,
        sink: RecordSink,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || loop {
            match rx.blocking_recv() {
                Ok(reading) => {
                    let arrival_ms = Utc::now().timestamp_millis();
                    let completed = {
                        let mut guard = tracker.write().unwrap();
                        guard.observe(&reading, arrival_ms)
                    };
                    if let Some(record) = completed {
                        sink.record(&record);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("reading consumer lagged, {} readings skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        })
    }
}
