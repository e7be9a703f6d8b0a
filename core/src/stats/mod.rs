pub mod median;
pub mod snapshot;

pub use median::median;
pub use snapshot::StatsSnapshot;
