use crate::device::profile::{DeviceConfig, ReadingSource};
use log::{error, info};
use std::thread;
use std::time::Duration;
use tococore::feed::ReadingBus;

/// Live simulated device: publishes readings on the bus at the configured
/// sample rate from a dedicated thread.
pub struct DeviceSimulator;

impl DeviceSimulator {
    pub fn spawn(bus: ReadingBus, config: DeviceConfig) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let mut source = match ReadingSource::new(&config) {
                Ok(source) => source,
                Err(err) => {
                    error!("device simulator failed to start: {}", err);
                    return;
                }
            };

            let sample_hz = if config.sample_hz > 0.0 {
                config.sample_hz
            } else {
                1.0
            };
            let tick = Duration::from_secs_f64(1.0 / sample_hz as f64);
            info!(
                "device simulator running at {} Hz (period {} s, contraction {} s)",
                sample_hz, config.period_secs, config.contraction_secs
            );

            loop {
                bus.publish(source.next_reading());
                thread::sleep(tick);
            }
        })
    }
}
