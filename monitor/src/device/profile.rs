use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tococore::feed::Reading;
use tococore::signal::FeatureExtractor;
use tococore::CoreResult;

/// Configuration for the simulated tocodynamometer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Samples per second published on the bus.
    pub sample_hz: f32,
    /// Seconds between contraction onsets.
    pub period_secs: f32,
    /// Seconds from onset back to resting tone.
    pub contraction_secs: f32,
    /// Resting uterine tone.
    pub baseline: f32,
    /// Peak pressure above baseline at the height of a contraction.
    pub amplitude: f32,
    /// Uniform measurement jitter added to each sample.
    pub noise: f32,
    pub seed: u64,
    /// Pressure at which the device asserts the contraction flag.
    pub flag_threshold: f32,
    /// Window length for the per-reading feature fields.
    pub feature_window: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sample_hz: 4.0,
            period_secs: 300.0,
            contraction_secs: 60.0,
            baseline: 12.0,
            amplitude: 55.0,
            noise: 1.5,
            seed: 0,
            flag_threshold: 20.0,
            feature_window: 64,
        }
    }
}

impl DeviceConfig {
    fn normalized_sample_hz(&self) -> f32 {
        if self.sample_hz > 0.0 {
            self.sample_hz
        } else {
            1.0
        }
    }
}

/// Deterministic synthetic sensor: a raised-cosine contraction envelope on a
/// resting baseline, with seeded jitter and the derived feature fields a real
/// bridge publishes.
pub struct ReadingSource {
    config: DeviceConfig,
    rng: StdRng,
    extractor: FeatureExtractor,
    history: Vec<f32>,
    idx: u64,
    epoch_ms: i64,
}

impl ReadingSource {
    pub fn new(config: &DeviceConfig) -> CoreResult<Self> {
        let extractor = FeatureExtractor::new(
            config.feature_window.max(1),
            config.normalized_sample_hz(),
        )?;
        Ok(Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(config.seed),
            extractor,
            history: Vec::with_capacity(config.feature_window.max(1)),
            idx: 0,
            epoch_ms: Utc::now().timestamp_millis(),
        })
    }

    /// Noise-free pressure at `t_secs` into the session.
    fn envelope_at(&self, t_secs: f32) -> f32 {
        let period = self.config.period_secs.max(1.0);
        let phase = t_secs.rem_euclid(period);
        let duration = self.config.contraction_secs.clamp(1.0, period);
        if phase < duration {
            // Raised cosine: smooth rise to peak and back over the
            // contraction.
            self.config.baseline
                + self.config.amplitude * 0.5 * (1.0 - (2.0 * PI * phase / duration).cos())
        } else {
            self.config.baseline
        }
    }

    pub fn next_reading(&mut self) -> Reading {
        let sample_hz = self.config.normalized_sample_hz();
        let t_secs = self.idx as f32 / sample_hz;

        let envelope = self.envelope_at(t_secs);
        let jitter = if self.config.noise > 0.0 {
            self.rng.gen_range(-self.config.noise..self.config.noise)
        } else {
            0.0
        };
        let value = envelope + jitter;

        self.history.push(value);
        let window = self.config.feature_window.max(1);
        if self.history.len() > window {
            self.history.remove(0);
        }
        let features = self.extractor.extract(&self.history).unwrap_or_default();

        // The flag tracks the noise-free envelope: the sensor firmware, not
        // the jittery measurement, decides "contraction active".
        let reading = Reading {
            value,
            idx: self.idx,
            c: u8::from(envelope >= self.config.flag_threshold),
            t: self.epoch_ms + ((t_secs * 1000.0) as i64),
            mean: features.mean,
            var: features.var,
            rms: features.rms,
            bp_0_0p5: features.band_power[0],
            bp_0p5_1: features.band_power[1],
            bp_1_2: features.band_power[2],
            bp_2_3: features.band_power[3],
        };
        self.idx += 1;
        reading
    }
}

/// Generates `seconds` worth of readings in one synchronous pass; used by
/// the offline runner and tests.
pub fn generate_readings(config: &DeviceConfig, seconds: f32) -> CoreResult<Vec<Reading>> {
    let mut source = ReadingSource::new(config)?;
    let count = (seconds * config.normalized_sample_hz()).ceil() as usize;
    Ok((0..count).map(|_| source.next_reading()).collect())
}
