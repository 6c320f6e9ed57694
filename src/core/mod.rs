//! Core signal types

/// Rate-tagged feature tracks
pub mod signal;
/// Decoded mono waveforms
pub mod waveform;

pub use signal::{SampledSignal, PADDING_WINDOW};
pub use waveform::Waveform;
