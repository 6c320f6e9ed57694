#![warn(missing_docs)]

//! # Acoustic Features: rate-tagged feature tracks for speech audio
//!
//! Extracts frame-level acoustic features (f0, volume) from audio files and
//! provides [`SampledSignal`], a uniformly sampled track that can be aligned
//! with other tracks and with waveforms.
//!
//! ## Features
//!
//! - **Resample** - Upsample a window of a track to a finer rate by frame repetition
//! - **Split** - Cut a track at keypoints given in seconds
//! - **Pad** - Recover a track's padding frame and pad batches to equal length
//! - **Persist** - Load and save tracks as `array` + `rate` containers
//! - **Extract** - F0 and volume contours from WAV, FLAC, MP3, OGG and more
//! - **CLI** - Batch extraction over many files on a worker pool
//!
//! ## Quick Start
//!
//! ```ignore
//! use acoustic_features::SampledSignal;
//!
//! // A 200 Hz f0 track, aligned to a 24 kHz waveform grid
//! let f0 = SampledSignal::load("f0/utt001.json")?;
//! let window = f0.resample(24000.0, 4800, 2400)?;
//!
//! // Trim at utterance boundaries
//! let parts = f0.split(&[0.5, 2.25])?;
//! ```

// Declare modules
/// Core signal types
pub mod core;
/// Error types for signal operations
pub mod error;
/// Signal container files
pub mod container;
/// Audio decoder implementations
pub mod decoder;
/// Waveform filters
pub mod filter;
/// Feature extractors
pub mod extract;
/// Batch processing over files
pub mod processor;

// Export public types
pub use crate::core::{SampledSignal, Waveform};
pub use crate::error::{SignalError, SignalResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
