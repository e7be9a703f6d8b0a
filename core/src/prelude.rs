/// Common error type for fallible core operations.
///
/// Deliberately narrow: malformed stream payloads are dropped rather than
/// reported, and insufficient-data conditions use `Option`/verdict variants,
/// so only genuinely invalid configuration surfaces here.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

pub use crate::feed::{ContractionInterval, ContractionRecord, Reading, ReadingBus};
pub use crate::pipeline::{evaluate, EdgeDetector, IntervalEvent, RuleConfig, RuleVerdict};
pub use crate::stats::{median, StatsSnapshot};
