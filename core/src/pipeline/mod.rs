pub mod detector;
pub mod rule;

pub use detector::{EdgeDetector, IntervalEvent};
pub use rule::{evaluate, RuleConfig, RuleVerdict};
