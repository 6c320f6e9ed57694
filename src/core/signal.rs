use crate::container;
use crate::error::{SignalError, SignalResult};
use log::debug;
use std::path::Path;
use std::time::Duration;

/// Number of frames inspected at each end by [`SampledSignal::estimate_padding_value`]
pub const PADDING_WINDOW: usize = 5;

/// Uniformly sampled feature track tagged with its frame rate
///
/// Frames are stored row-major in a flat buffer: frame `i` occupies
/// `samples[i * width..(i + 1) * width]`. The width is fixed for the lifetime
/// of the signal, and a one-dimensional track is stored with width 1.
///
/// Values are `f32`. Integers are exact up to 2^24; larger integers and `f64`
/// data are rounded when a signal is built or loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSignal {
    /// Flat row-major frame buffer
    samples: Vec<f32>,
    /// Values per frame
    width: usize,
    /// Frames per second
    rate: f64,
}

fn validate_rate(rate: f64) -> SignalResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(SignalError::InvalidRate { rate })
    }
}

impl SampledSignal {
    /// Create a signal from a flat row-major buffer
    ///
    /// A signal with zero frames is allowed (splitting can produce one), but
    /// operations that need a frame reject it with [`SignalError::EmptySignal`].
    pub fn new(samples: Vec<f32>, width: usize, rate: f64) -> SignalResult<Self> {
        validate_rate(rate)?;

        if width == 0 || samples.len() % width != 0 {
            return Err(SignalError::InvalidShape {
                len: samples.len(),
                width,
            });
        }

        Ok(SampledSignal {
            samples,
            width,
            rate,
        })
    }

    /// Create a signal from a list of frames, which must all have the same width
    pub fn from_frames(frames: Vec<Vec<f32>>, rate: f64) -> SignalResult<Self> {
        let width = frames.first().map(Vec::len).ok_or(SignalError::EmptySignal)?;

        let mut samples = Vec::with_capacity(frames.len() * width);
        for frame in &frames {
            if frame.len() != width {
                return Err(SignalError::InvalidShape {
                    len: frame.len(),
                    width,
                });
            }
            samples.extend_from_slice(frame);
        }

        Self::new(samples, width, rate)
    }

    /// Create a width-1 signal from a bare sequence of values
    pub fn from_vector(values: Vec<f32>, rate: f64) -> SignalResult<Self> {
        Self::new(values, 1, rate)
    }

    /// Load a signal from a container file
    pub fn load<P: AsRef<Path>>(path: P) -> SignalResult<Self> {
        container::read(path.as_ref())
    }

    /// Save the signal to a container file
    ///
    /// Fails with [`SignalError::EmptySignal`] for a zero-frame signal and
    /// [`SignalError::NonFiniteSample`] if any value is NaN or infinite.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SignalResult<()> {
        container::write(path.as_ref(), self)
    }

    /// Get the flat frame buffer
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get owned samples (consumes signal)
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Number of values per frame
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frames per second
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.samples.len() / self.width
    }

    /// Check if the signal has no frames
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get a single frame
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        self.samples
            .get(index * self.width..(index + 1) * self.width)
    }

    /// Iterate over frames in time order
    pub fn frames(&self) -> std::slice::ChunksExact<'_, f32> {
        self.samples.chunks_exact(self.width)
    }

    /// Time covered by the signal
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.len() as f64 / self.rate)
    }

    fn frame_at(&self, index: usize) -> &[f32] {
        &self.samples[index * self.width..(index + 1) * self.width]
    }

    /// Integer upsampling factor from this signal's rate to `target_rate`
    fn scale_to(&self, target_rate: f64) -> SignalResult<usize> {
        if !target_rate.is_finite() || target_rate < self.rate || target_rate % self.rate != 0.0 {
            return Err(SignalError::IncompatibleRate {
                target: target_rate,
                rate: self.rate,
            });
        }

        Ok((target_rate / self.rate).round() as usize)
    }

    /// Cut `length` frames starting at `index` out of this signal upsampled to `target_rate`
    ///
    /// Upsampling repeats every frame `target_rate / rate` times; there is no
    /// interpolation and no downsampling. `target_rate` must be an integer
    /// multiple of the signal rate. A window reaching past the end of the
    /// signal yields a shorter result rather than padding. The result never
    /// aliases this signal's buffer.
    pub fn resample(
        &self,
        target_rate: f64,
        index: usize,
        length: usize,
    ) -> SignalResult<SampledSignal> {
        let scale = self.scale_to(target_rate)?;
        let width = self.width;
        let frames = self.len();

        // Two extra native frames cover any sub-scale offset of `index`.
        let native_index = index / scale;
        let native_length = (length / scale).saturating_add(2);
        let start = native_index.min(frames);
        let end = native_index.saturating_add(native_length).min(frames);
        let window = &self.samples[start * width..end * width];

        let mut expanded: Vec<f32> = if scale > 1 {
            window
                .chunks_exact(width)
                .flat_map(|frame| std::iter::repeat(frame).take(scale).flatten().copied())
                .collect()
        } else {
            window.to_vec()
        };

        let expanded_frames = expanded.len() / width;
        let offset = index - native_index * scale;
        let from = offset.min(expanded_frames);
        let to = offset.saturating_add(length).min(expanded_frames);
        if to - from < length {
            debug!(
                "resample window {}+{} at {} Hz is short: {} frames",
                index,
                length,
                target_rate,
                to - from
            );
        }

        expanded.truncate(to * width);
        expanded.drain(..from * width);

        SampledSignal::new(expanded, width, target_rate)
    }

    /// Split at keypoints given in seconds
    ///
    /// K keypoints produce K + 1 contiguous segments whose concatenation is
    /// this signal. A keypoint maps to frame `floor(seconds * rate)`. Keypoints
    /// must be finite, non-negative, non-decreasing and inside the signal;
    /// repeated keypoints produce empty segments.
    pub fn split(&self, keypoint_seconds: &[f64]) -> SignalResult<Vec<SampledSignal>> {
        let frames = self.len();

        let mut boundaries = Vec::with_capacity(keypoint_seconds.len() + 2);
        boundaries.push(0);

        let mut previous = 0.0;
        for (position, &seconds) in keypoint_seconds.iter().enumerate() {
            let index = (seconds * self.rate).trunc();
            if !seconds.is_finite() || seconds < previous || index > frames as f64 {
                return Err(SignalError::InvalidKeypoint { position, seconds });
            }
            boundaries.push(index as usize);
            previous = seconds;
        }
        boundaries.push(frames);

        boundaries
            .windows(2)
            .map(|bounds| {
                let segment = self.samples[bounds[0] * self.width..bounds[1] * self.width].to_vec();
                SampledSignal::new(segment, self.width, self.rate)
            })
            .collect()
    }

    /// Recover the constant frame this signal was padded with
    ///
    /// The first and last [`PADDING_WINDOW`] frames (all frames of a shorter
    /// signal) must be identical; this is a strict check, not an estimate.
    pub fn estimate_padding_value(&self) -> SignalResult<Vec<f32>> {
        let frames = self.len();
        if frames == 0 {
            return Err(SignalError::EmptySignal);
        }

        let expected = self.frame_at(0);
        let head = 0..frames.min(PADDING_WINDOW);
        let tail = frames.saturating_sub(PADDING_WINDOW)..frames;

        for index in head.chain(tail) {
            let found = self.frame_at(index);
            if found != expected {
                return Err(SignalError::InconsistentPadding {
                    index,
                    expected: expected.to_vec(),
                    found: found.to_vec(),
                });
            }
        }

        Ok(expected.to_vec())
    }

    /// Extend every signal with `padding_frame` up to the longest length in the batch
    ///
    /// Inputs are left untouched; every output is a fresh copy. Rates are
    /// carried over per signal and are expected, not checked, to agree.
    pub fn padding(
        signals: &[SampledSignal],
        padding_frame: &[f32],
    ) -> SignalResult<Vec<SampledSignal>> {
        let Some(max_length) = signals.iter().map(SampledSignal::len).max() else {
            return Ok(Vec::new());
        };

        signals
            .iter()
            .map(|signal| {
                if padding_frame.len() != signal.width {
                    return Err(SignalError::WidthMismatch {
                        expected: signal.width,
                        got: padding_frame.len(),
                    });
                }

                let missing = max_length - signal.len();
                let mut samples = Vec::with_capacity(max_length * signal.width);
                samples.extend_from_slice(&signal.samples);
                for _ in 0..missing {
                    samples.extend_from_slice(padding_frame);
                }

                SampledSignal::new(samples, signal.width, signal.rate)
            })
            .collect()
    }

    /// Check whether every frame equals the first one
    pub fn all_same(&self) -> SignalResult<bool> {
        let first = self.frame(0).ok_or(SignalError::EmptySignal)?;
        Ok(self.frames().all(|frame| frame == first))
    }
}
