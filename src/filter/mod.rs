//! Waveform filters applied while loading audio

/// Channel downmixing
pub mod remix;
/// Sample rate conversion
pub mod resample;

pub use remix::downmix_into;
pub use resample::Resample;

use crate::core::Waveform;
use crate::error::SignalResult;

/// Trait for waveform filters
pub trait Filter {
    /// Process a waveform through this filter
    fn process(&mut self, waveform: &Waveform) -> SignalResult<Waveform>;
}
