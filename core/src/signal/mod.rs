pub mod features;

pub use features::{FeatureExtractor, SignalFeatures, BANDS_HZ};
