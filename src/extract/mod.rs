//! Feature extractors producing sampled signals from waveforms

/// F0 estimation
pub mod pitch;
/// Frame energy in decibels
pub mod volume;

pub use pitch::{Autocorrelation, PitchConfig, PitchExtractor};
pub use volume::{VolumeConfig, extract_volume};
