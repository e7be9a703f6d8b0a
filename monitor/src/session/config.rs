use crate::device::profile::DeviceConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tococore::pipeline::RuleConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// HTTP bridge port on localhost.
    pub port: u16,
    /// SSE comment-heartbeat period, seconds.
    pub heartbeat_secs: u64,
    /// Capacity of the in-process reading bus.
    pub bus_capacity: usize,
    pub rule: RuleConfig,
    pub device: DeviceConfig,
    /// Row-store insert endpoint for completed contractions; omitted means
    /// records stay in memory only.
    pub record_endpoint: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port: 9000,
            heartbeat_secs: 25,
            bus_capacity: 1024,
            rule: RuleConfig::default(),
            device: DeviceConfig::default(),
            record_endpoint: None,
        }
    }
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading monitor config {}", path_ref.display()))?;
        let config: MonitorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing monitor config {}", path_ref.display()))?;
        Ok(config)
    }
}
