pub mod bus;
pub mod interval;
pub mod reading;
pub mod record;

pub use bus::ReadingBus;
pub use interval::ContractionInterval;
pub use reading::Reading;
pub use record::ContractionRecord;
