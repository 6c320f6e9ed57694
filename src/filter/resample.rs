use crate::core::Waveform;
use crate::error::{SignalError, SignalResult};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Input frames fed to the sinc resampler per call
const CHUNK_SIZE: usize = 1024;

/// Band-limited waveform resampler built on `rubato`
pub struct Resample {
    input_rate: u32,
    output_rate: u32,
}

impl Resample {
    /// Create a new resampler
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    pub fn new(input_rate: u32, output_rate: u32) -> SignalResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(SignalError::InvalidRate { rate: 0.0 });
        }

        Ok(Resample {
            input_rate,
            output_rate,
        })
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Get the ratio of output to input sample rate
    pub fn ratio(&self) -> f64 {
        self.output_rate as f64 / self.input_rate as f64
    }

    fn sinc_resample(&self, input: &[f32]) -> SignalResult<Vec<f32>> {
        let ratio = self.ratio();
        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.925,
            interpolation: SincInterpolationType::Cubic,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_SIZE, 1)
            .map_err(|e| SignalError::ResamplingError(e.to_string()))?;

        let expected = (input.len() as f64 * ratio).round() as usize;
        let delay = resampler.output_delay();
        let mut output = Vec::with_capacity(expected + delay + CHUNK_SIZE);

        let mut position = 0;
        while input.len() - position >= resampler.input_frames_next() {
            let next = resampler.input_frames_next();
            let chunk = resampler
                .process(&[&input[position..position + next]], None)
                .map_err(|e| SignalError::ResamplingError(e.to_string()))?;
            output.extend_from_slice(&chunk[0]);
            position += next;
        }

        if position < input.len() {
            let chunk = resampler
                .process_partial(Some(&[&input[position..]][..]), None)
                .map_err(|e| SignalError::ResamplingError(e.to_string()))?;
            output.extend_from_slice(&chunk[0]);
        }

        // Flush the filter delay with silence.
        while output.len() < expected + delay {
            let chunk = resampler
                .process_partial::<&[f32]>(None, None)
                .map_err(|e| SignalError::ResamplingError(e.to_string()))?;
            if chunk[0].is_empty() {
                break;
            }
            output.extend_from_slice(&chunk[0]);
        }

        output.drain(..delay.min(output.len()));
        output.truncate(expected);
        Ok(output)
    }
}

impl super::Filter for Resample {
    fn process(&mut self, waveform: &Waveform) -> SignalResult<Waveform> {
        if waveform.sample_rate() != self.input_rate {
            return Err(SignalError::InvalidRate {
                rate: waveform.sample_rate() as f64,
            });
        }

        if self.input_rate == self.output_rate || waveform.is_empty() {
            return Waveform::new(waveform.samples().to_vec(), self.output_rate);
        }

        let resampled = self.sinc_resample(waveform.samples())?;
        Waveform::new(resampled, self.output_rate)
    }
}
