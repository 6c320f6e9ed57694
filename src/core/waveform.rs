use crate::error::{SignalError, SignalResult};
use std::time::Duration;

/// Mono audio waveform as produced by the waveform loader
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Samples, f32 from -1.0 to 1.0
    samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 16000, 24000, 44100)
    sample_rate: u32,
}

impl Waveform {
    /// Create a new waveform
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> SignalResult<Self> {
        if sample_rate == 0 {
            return Err(SignalError::InvalidRate { rate: 0.0 });
        }

        Ok(Waveform {
            samples,
            sample_rate,
        })
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get owned samples (consumes waveform)
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if waveform is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get duration of this waveform
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_creation() {
        let waveform = Waveform::new(vec![0.0; 8000], 16000).unwrap();
        assert_eq!(waveform.sample_rate(), 16000);
        assert_eq!(waveform.len(), 8000);
        assert_eq!(waveform.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_waveform_invalid_rate() {
        assert!(Waveform::new(vec![0.0], 0).is_err());
    }
}
