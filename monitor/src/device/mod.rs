pub mod profile;
pub mod simulator;
