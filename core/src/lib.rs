//! Contraction-timing and statistics core for the maternal monitoring
//! platform.
//!
//! The modules mirror the live pipeline: `feed` carries the wire types and
//! the in-process fan-out bus, `pipeline` turns the raw flag stream into
//! contraction intervals and evaluates the 5-1-1 labor heuristic, `stats`
//! derives session statistics, and `signal` computes the per-window features
//! a simulated sensor reports alongside each sample.

pub mod feed;
pub mod pipeline;
pub mod prelude;
pub mod signal;
pub mod stats;
pub mod telemetry;

pub use prelude::{CoreError, CoreResult};
