use crate::core::{SampledSignal, Waveform};
use crate::error::{SignalError, SignalResult};
use serde::Serialize;

/// Configuration for f0 extraction
#[derive(Debug, Clone, Serialize)]
pub struct PitchConfig {
    /// Sample rate the waveform is loaded at, in Hz
    pub sampling_rate: u32,
    /// Spacing between analysis frames in milliseconds
    pub frame_period: f64,
    /// Lowest detectable f0 in Hz
    pub f0_floor: f64,
    /// Highest detectable f0 in Hz
    pub f0_ceil: f64,
    /// Append a voiced/unvoiced flag to every frame
    pub with_vuv: bool,
}

impl Default for PitchConfig {
    fn default() -> Self {
        PitchConfig {
            sampling_rate: 24000,
            frame_period: 5.0,
            f0_floor: 71.0,
            f0_ceil: 800.0,
            with_vuv: false,
        }
    }
}

impl PitchConfig {
    /// Check the configuration
    pub fn validate(&self) -> SignalResult<()> {
        if self.sampling_rate == 0 {
            return Err(SignalError::ConfigError(
                "Sampling rate must be positive".to_string(),
            ));
        }
        if !(self.frame_period.is_finite() && self.frame_period > 0.0) {
            return Err(SignalError::ConfigError(format!(
                "Frame period must be positive, got {}",
                self.frame_period
            )));
        }
        if !(self.f0_floor > 0.0 && self.f0_floor < self.f0_ceil) {
            return Err(SignalError::ConfigError(format!(
                "Expected 0 < f0_floor < f0_ceil, got {} and {}",
                self.f0_floor, self.f0_ceil
            )));
        }
        if self.f0_ceil >= self.sampling_rate as f64 / 2.0 {
            return Err(SignalError::ConfigError(format!(
                "f0_ceil {} must be below the Nyquist frequency of {} Hz",
                self.f0_ceil, self.sampling_rate
            )));
        }
        Ok(())
    }

    /// Frame rate of the extracted signal
    pub fn rate(&self) -> f64 {
        1000.0 / self.frame_period
    }

    /// Number of frames for a waveform of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        let duration_ms = len as f64 * 1000.0 / self.sampling_rate as f64;
        (duration_ms / self.frame_period).floor() as usize + 1
    }

    /// Pack per-frame f0 values (0 for unvoiced) into a signal
    ///
    /// With `with_vuv` every frame is `[f0, vuv]`, otherwise `[f0]`.
    pub fn to_signal(&self, f0: Vec<f32>) -> SignalResult<SampledSignal> {
        if self.with_vuv {
            let samples = f0
                .into_iter()
                .flat_map(|f| [f, if f > 0.0 { 1.0 } else { 0.0 }])
                .collect();
            SampledSignal::new(samples, 2, self.rate())
        } else {
            SampledSignal::from_vector(f0, self.rate())
        }
    }
}

/// Trait for f0 estimators
pub trait PitchExtractor: Send + Sync {
    /// Estimate the f0 contour of a waveform at `config.rate()` frames per second
    fn extract(&self, waveform: &Waveform, config: &PitchConfig) -> SignalResult<SampledSignal>;
}

/// Normalized autocorrelation f0 estimator
///
/// Each frame picks the shortest lag whose correlation peak is close to the
/// best one in the `[f0_floor, f0_ceil]` range, refined by parabolic
/// interpolation. Frames below `voicing_threshold` are unvoiced.
#[derive(Debug, Clone)]
pub struct Autocorrelation {
    /// Minimum normalized correlation of a voiced frame
    pub voicing_threshold: f32,
    /// Fraction of the best peak a shorter lag must reach to be preferred
    pub peak_tolerance: f32,
}

impl Default for Autocorrelation {
    fn default() -> Self {
        Autocorrelation {
            voicing_threshold: 0.6,
            peak_tolerance: 0.9,
        }
    }
}

impl Autocorrelation {
    /// Normalized correlation for every lag in `min_lag..=max_lag`
    fn correlations(window: &[f32], min_lag: usize, max_lag: usize) -> Vec<f32> {
        (min_lag..=max_lag)
            .map(|lag| {
                let overlap = window.len().saturating_sub(lag);
                let (mut cross, mut head, mut tail) = (0.0f64, 0.0f64, 0.0f64);
                for j in 0..overlap {
                    let a = window[j] as f64;
                    let b = window[j + lag] as f64;
                    cross += a * b;
                    head += a * a;
                    tail += b * b;
                }
                let norm = (head * tail).sqrt();
                if norm > 0.0 { (cross / norm) as f32 } else { 0.0 }
            })
            .collect()
    }

    /// Lag (in samples, fractional) of the selected peak, if voiced
    fn best_lag(&self, correlations: &[f32], min_lag: usize) -> Option<f64> {
        let best = correlations.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if best.is_nan() || best < self.voicing_threshold {
            return None;
        }

        let last = correlations.len() - 1;
        let k = (0..=last).find(|&k| {
            let value = correlations[k];
            let rising = k == 0 || correlations[k - 1] <= value;
            let falling = k == last || correlations[k + 1] <= value;
            rising && falling && value >= best * self.peak_tolerance
        })?;

        let mut shift = 0.0;
        if k > 0 && k < last {
            let (a, b, c) = (
                correlations[k - 1] as f64,
                correlations[k] as f64,
                correlations[k + 1] as f64,
            );
            let denominator = a - 2.0 * b + c;
            if denominator != 0.0 {
                shift = (0.5 * (a - c) / denominator).clamp(-0.5, 0.5);
            }
        }

        Some((min_lag + k) as f64 + shift)
    }
}

impl PitchExtractor for Autocorrelation {
    fn extract(&self, waveform: &Waveform, config: &PitchConfig) -> SignalResult<SampledSignal> {
        config.validate()?;
        if waveform.sample_rate() != config.sampling_rate {
            return Err(SignalError::InvalidRate {
                rate: waveform.sample_rate() as f64,
            });
        }

        let sample_rate = config.sampling_rate as f64;
        let min_lag = ((sample_rate / config.f0_ceil).floor() as usize).max(1);
        let max_lag = (sample_rate / config.f0_floor).ceil() as usize;
        let half_window = max_lag;
        let samples = waveform.samples();

        let mut window = vec![0.0f32; 2 * half_window];
        let f0 = (0..config.frame_count(samples.len()))
            .map(|i| {
                let center = (i as f64 * config.frame_period * sample_rate / 1000.0).round() as usize;

                // Zero outside the waveform.
                for (j, slot) in window.iter_mut().enumerate() {
                    *slot = (center + j)
                        .checked_sub(half_window)
                        .and_then(|index| samples.get(index))
                        .copied()
                        .unwrap_or(0.0);
                }

                let correlations = Self::correlations(&window, min_lag, max_lag);
                self.best_lag(&correlations, min_lag)
                    .map(|lag| (sample_rate / lag) as f32)
                    .filter(|&f| (config.f0_floor as f32..=config.f0_ceil as f32).contains(&f))
                    .unwrap_or(0.0)
            })
            .collect();

        config.to_signal(f0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(frequency: f32, sample_rate: u32, len: usize) -> Waveform {
        let samples = (0..len)
            .map(|i| 0.5 * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect();
        Waveform::new(samples, sample_rate).unwrap()
    }

    fn config(with_vuv: bool) -> PitchConfig {
        PitchConfig {
            sampling_rate: 16000,
            with_vuv,
            ..PitchConfig::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(PitchConfig::default().validate().is_ok());

        let inverted = PitchConfig {
            f0_floor: 800.0,
            f0_ceil: 71.0,
            ..PitchConfig::default()
        };
        assert!(matches!(inverted.validate(), Err(SignalError::ConfigError(_))));

        let above_nyquist = PitchConfig {
            sampling_rate: 1000,
            ..PitchConfig::default()
        };
        assert!(above_nyquist.validate().is_err());
    }

    #[test]
    fn test_frame_count_and_rate() {
        let config = config(false);
        assert_eq!(config.rate(), 200.0);
        assert_eq!(config.frame_count(8000), 101);
        assert_eq!(config.frame_count(0), 1);
    }

    #[test]
    fn test_to_signal_with_vuv() {
        let signal = config(true).to_signal(vec![0.0, 120.0, 0.0]).unwrap();

        assert_eq!(signal.width(), 2);
        assert_eq!(signal.samples(), &[0.0, 0.0, 120.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_autocorrelation_sine() {
        let config = config(false);
        let waveform = sine(200.0, 16000, 8000);

        let f0 = Autocorrelation::default().extract(&waveform, &config).unwrap();

        assert_eq!(f0.len(), 101);
        assert_eq!(f0.width(), 1);
        assert_eq!(f0.rate(), 200.0);
        for frame in f0.frames().skip(10).take(80) {
            assert!((frame[0] - 200.0).abs() < 1.0, "got {}", frame[0]);
        }
    }

    #[test]
    fn test_autocorrelation_low_pitch() {
        let config = config(false);
        let waveform = sine(110.0, 16000, 8000);

        let f0 = Autocorrelation::default().extract(&waveform, &config).unwrap();

        let middle = f0.frame(50).unwrap()[0];
        assert!((middle - 110.0).abs() < 1.0, "got {}", middle);
    }

    #[test]
    fn test_autocorrelation_silence_is_unvoiced() {
        let config = config(true);
        let waveform = Waveform::new(vec![0.0; 4000], 16000).unwrap();

        let f0 = Autocorrelation::default().extract(&waveform, &config).unwrap();

        assert_eq!(f0.width(), 2);
        assert!(f0.all_same().unwrap());
        assert_eq!(f0.frame(0).unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_autocorrelation_rate_mismatch() {
        let waveform = sine(200.0, 22050, 2205);
        assert!(Autocorrelation::default().extract(&waveform, &config(false)).is_err());
    }
}
