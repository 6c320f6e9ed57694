use crate::core::{SampledSignal, Waveform};
use crate::error::{SignalError, SignalResult};
use serde::Serialize;

/// Smallest power considered when converting to decibels
const AMIN: f64 = 1e-10;

/// Configuration for frame-energy extraction
#[derive(Debug, Clone, Serialize)]
pub struct VolumeConfig {
    /// Sample rate the waveform is loaded at, in Hz
    pub sampling_rate: u32,
    /// Analysis window length in samples
    pub frame_length: usize,
    /// Hop between frames in samples; must divide `sampling_rate`
    pub hop_length: usize,
    /// Dynamic range kept below the loudest frame, in dB
    pub top_db: f32,
    /// Map the kept dynamic range onto [0, 1]
    pub normalize: bool,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        VolumeConfig {
            sampling_rate: 24000,
            frame_length: 800,
            hop_length: 200,
            top_db: 80.0,
            normalize: false,
        }
    }
}

impl VolumeConfig {
    /// Check the configuration
    pub fn validate(&self) -> SignalResult<()> {
        if self.sampling_rate == 0 {
            return Err(SignalError::ConfigError(
                "Sampling rate must be positive".to_string(),
            ));
        }
        if self.frame_length == 0 || self.hop_length == 0 {
            return Err(SignalError::ConfigError(format!(
                "Frame and hop length must be positive, got {} and {}",
                self.frame_length, self.hop_length
            )));
        }
        if self.sampling_rate as usize % self.hop_length != 0 {
            return Err(SignalError::ConfigError(format!(
                "Hop length {} does not divide sampling rate {}",
                self.hop_length, self.sampling_rate
            )));
        }
        if !(self.top_db.is_finite() && self.top_db > 0.0) {
            return Err(SignalError::ConfigError(format!(
                "top_db must be positive, got {}",
                self.top_db
            )));
        }
        Ok(())
    }

    /// Frame rate of the extracted signal
    pub fn rate(&self) -> f64 {
        (self.sampling_rate as usize / self.hop_length) as f64
    }
}

/// Mean power of centered frames
///
/// The input is reflect-padded by `frame_length / 2` on both sides, mirroring
/// around the edge samples without repeating them, and frame `i` covers padded
/// samples `i * hop_length..i * hop_length + frame_length`.
pub fn frame_power(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    let pad = frame_length / 2;
    let padded_len = samples.len() + 2 * pad;
    if samples.is_empty() || padded_len < frame_length || hop_length == 0 {
        return Vec::new();
    }
    let frames = 1 + (padded_len - frame_length) / hop_length;

    // Prefix sums of squared padded samples.
    let mut energy = Vec::with_capacity(padded_len + 1);
    energy.push(0.0f64);
    for i in 0..padded_len {
        let s = samples[reflect_index(i as isize - pad as isize, samples.len())] as f64;
        let last = energy[energy.len() - 1];
        energy.push(last + s * s);
    }

    (0..frames)
        .map(|i| {
            let start = i * hop_length;
            (energy[start + frame_length] - energy[start]).max(0.0) / frame_length as f64
        })
        .collect()
}

/// Map a possibly out-of-range index onto `0..len` by mirroring at the ends
fn reflect_index(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= len as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Convert power to decibels, flooring at `top_db` below the maximum
pub fn power_to_db(power: &[f64], top_db: f32) -> Vec<f32> {
    let db: Vec<f64> = power.iter().map(|&p| 10.0 * p.max(AMIN).log10()).collect();
    let floor = db.iter().copied().fold(f64::NEG_INFINITY, f64::max) - top_db as f64;
    db.into_iter().map(|d| d.max(floor) as f32).collect()
}

/// Compute the log-power volume contour of a waveform
///
/// The last frame is dropped so the contour holds exactly
/// `len / hop_length` frames for whole-hop inputs.
pub fn extract_volume(waveform: &Waveform, config: &VolumeConfig) -> SignalResult<SampledSignal> {
    config.validate()?;
    if waveform.sample_rate() != config.sampling_rate {
        return Err(SignalError::InvalidRate {
            rate: waveform.sample_rate() as f64,
        });
    }

    let power = frame_power(waveform.samples(), config.frame_length, config.hop_length);
    let mut db = power_to_db(&power, config.top_db);
    db.pop();
    if db.is_empty() {
        return Err(SignalError::EmptySignal);
    }

    if config.normalize {
        let max = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        for value in &mut db {
            *value = ((*value - max) / config.top_db + 1.0).clamp(0.0, 1.0);
        }
    }

    SampledSignal::from_vector(db, config.rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_config_validation() {
        assert!(VolumeConfig::default().validate().is_ok());

        let config = VolumeConfig {
            hop_length: 7,
            ..VolumeConfig::default()
        };
        assert!(matches!(config.validate(), Err(SignalError::ConfigError(_))));

        let config = VolumeConfig {
            top_db: 0.0,
            ..VolumeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_power_centered() {
        let power = frame_power(&[1.0; 8], 4, 2);

        // Padded to 12 samples: frames start at -2, 0, 2, 4, 6.
        assert_eq!(power.len(), 5);
        assert!(power.iter().all(|&p| p == 1.0));
    }

    #[test]
    fn test_frame_power_reflect_padding() {
        // Padded to [3, 2, 1, 2, 3, 4, 3, 2].
        let power = frame_power(&[1.0, 2.0, 3.0, 4.0], 4, 2);

        assert_eq!(power, vec![4.5, 7.5, 9.5]);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-2, 4), 2);
        assert_eq!(reflect_index(5, 4), 1);
        assert_eq!(reflect_index(-7, 4), 1);
        assert_eq!(reflect_index(3, 1), 0);
        assert!(frame_power(&[], 4, 2).is_empty());
    }

    #[test]
    fn test_power_to_db_floor() {
        let db = power_to_db(&[1.0, 0.1, 1e-12], 50.0);
        assert_eq!(db[0], 0.0);
        assert!((db[1] + 10.0).abs() < 1e-5);
        assert_eq!(db[2], -50.0);
    }

    #[test]
    fn test_extract_volume_frames_and_rate() {
        let samples: Vec<f32> = (0..24000)
            .map(|i| (2.0 * PI * 300.0 * i as f32 / 24000.0).sin())
            .collect();
        let waveform = Waveform::new(samples, 24000).unwrap();

        let volume = extract_volume(&waveform, &VolumeConfig::default()).unwrap();

        assert_eq!(volume.rate(), 120.0);
        assert_eq!(volume.width(), 1);
        assert_eq!(volume.len(), 120);
        // A full-scale sine has mean power 1/2.
        let middle = volume.frame(60).unwrap()[0];
        assert!((middle + 3.0103).abs() < 0.05);
    }

    #[test]
    fn test_extract_volume_normalized() {
        let mut samples = vec![0.0f32; 12000];
        samples.extend((0..12000).map(|i| 0.5 * (2.0 * PI * 250.0 * i as f32 / 24000.0).sin()));
        let waveform = Waveform::new(samples, 24000).unwrap();

        let config = VolumeConfig {
            normalize: true,
            ..VolumeConfig::default()
        };
        let volume = extract_volume(&waveform, &config).unwrap();

        assert!(volume.samples().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(volume.frame(10).unwrap()[0] < 1e-4);
        assert!((volume.frame(100).unwrap()[0] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_volume_rate_mismatch() {
        let waveform = Waveform::new(vec![0.0; 1000], 16000).unwrap();
        assert!(extract_volume(&waveform, &VolumeConfig::default()).is_err());
    }
}
