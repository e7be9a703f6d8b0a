use crate::prelude::{CoreError, CoreResult};
use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Frequency bands (Hz) reported alongside each reading, matching the wire
/// fields `bp_0_0p5` through `bp_2_3`.
pub const BANDS_HZ: [(f32, f32); 4] = [(0.0, 0.5), (0.5, 1.0), (1.0, 2.0), (2.0, 3.0)];

/// Derived features for one sample window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalFeatures {
    pub mean: f32,
    pub var: f32,
    pub rms: f32,
    pub band_power: [f32; 4],
}

/// Computes windowed features with a reusable FFT plan.
pub struct FeatureExtractor {
    fft: std::sync::Arc<dyn Fft<f32>>,
    window: usize,
    sample_hz: f32,
}

impl FeatureExtractor {
    pub fn new(window: usize, sample_hz: f32) -> CoreResult<Self> {
        if window == 0 {
            return Err(CoreError::InvalidInput("window must be non-empty".into()));
        }
        if sample_hz <= 0.0 {
            return Err(CoreError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(window);
        Ok(Self {
            fft,
            window,
            sample_hz,
        })
    }

    /// Extracts features from the most recent `window` samples. Shorter
    /// input is zero-padded; longer input keeps its tail.
    pub fn extract(&self, samples: &[f32]) -> CoreResult<SignalFeatures> {
        if samples.is_empty() {
            return Err(CoreError::InvalidInput("no samples provided".into()));
        }

        let tail = if samples.len() > self.window {
            &samples[samples.len() - self.window..]
        } else {
            samples
        };

        let mean = tail.iter().sum::<f32>() / tail.len() as f32;
        let var = tail.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / tail.len() as f32;
        let rms = (tail.iter().map(|v| v * v).sum::<f32>() / tail.len() as f32).sqrt();

        let mut buffer: Vec<Complex32> = tail
            .iter()
            .map(|&value| Complex32::new(value, 0.0))
            .collect();
        buffer.resize(self.window, Complex32::zero());
        self.fft.process(&mut buffer);

        let bin_hz = self.sample_hz / self.window as f32;
        let mut band_power = [0.0f32; 4];
        // One-sided spectrum; the DC bin is skipped so resting tone does not
        // swamp the lowest band.
        for (bin, value) in buffer
            .iter()
            .enumerate()
            .take(self.window / 2 + 1)
            .skip(1)
        {
            let freq = bin as f32 * bin_hz;
            let power = value.norm_sqr() / self.window as f32;
            for (slot, (lo, hi)) in band_power.iter_mut().zip(BANDS_HZ) {
                if freq >= lo && freq < hi {
                    *slot += power;
                }
            }
        }

        Ok(SignalFeatures {
            mean,
            var,
            rms,
            band_power,
        })
    }
}
