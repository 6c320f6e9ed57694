//! Waveform loading

/// Decoding through symphonia's format probe
pub mod symphonia;
/// WAV decoding through hound
pub mod wav;

pub use symphonia::SymphoniaDecoder;
pub use wav::WavDecoder;

use crate::core::Waveform;
use crate::error::{SignalError, SignalResult};
use crate::filter::{Filter, Resample, downmix_into};
use log::debug;
use std::path::Path;

/// Trait for audio decoders
pub trait Decoder: Send {
    /// Native sample rate of the stream
    fn sample_rate(&self) -> u32;

    /// Number of interleaved channels
    fn channels(&self) -> usize;

    /// Decode the next packet as interleaved samples, `None` at end of stream
    fn decode_packet(&mut self) -> SignalResult<Option<Vec<f32>>>;

    /// Check if decoder is finished
    fn is_finished(&self) -> bool;
}

/// Create a decoder from a file path
///
/// WAV files are read with `hound`; every other container goes through symphonia.
pub fn from_file<P: AsRef<Path>>(path: P) -> SignalResult<Box<dyn Decoder>> {
    let path = path.as_ref();
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        WavDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
    } else {
        SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
    }
}

/// Decode a file to a mono waveform at `target_rate`
///
/// Channels are averaged and the result is resampled when the native rate differs.
pub fn load_waveform<P: AsRef<Path>>(path: P, target_rate: u32) -> SignalResult<Waveform> {
    let path = path.as_ref();
    if target_rate == 0 {
        return Err(SignalError::InvalidRate { rate: 0.0 });
    }

    let mut decoder = from_file(path)?;
    let channels = decoder.channels();
    let native_rate = decoder.sample_rate();

    let mut mono = Vec::new();
    while let Some(packet) = decoder.decode_packet()? {
        downmix_into(&mut mono, &packet, channels);
    }

    debug!(
        "decoded {:?}: {} samples, {} channel(s) at {} Hz",
        path,
        mono.len(),
        channels,
        native_rate
    );

    let waveform = Waveform::new(mono, native_rate)?;
    Resample::new(native_rate, target_rate)?.process(&waveform)
}
