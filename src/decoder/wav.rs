use crate::error::{SignalError, SignalResult};
use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Frames read per packet
const PACKET_FRAMES: usize = 4096;

/// WAV decoder backed by `hound`
pub struct WavDecoder {
    reader: WavReader<BufReader<File>>,
    sample_rate: u32,
    channels: usize,
    format: SampleFormat,
    bits_per_sample: u16,
    finished: bool,
}

impl WavDecoder {
    /// Open a WAV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SignalResult<Self> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();

        if spec.channels == 0 {
            return Err(SignalError::DecodeError("WAV file has no channels".to_string()));
        }
        if spec.sample_format == SampleFormat::Int && !(1..=32).contains(&spec.bits_per_sample) {
            return Err(SignalError::UnsupportedFormat(format!(
                "{}-bit integer WAV",
                spec.bits_per_sample
            )));
        }

        Ok(WavDecoder {
            reader,
            sample_rate: spec.sample_rate,
            channels: spec.channels as usize,
            format: spec.sample_format,
            bits_per_sample: spec.bits_per_sample,
            finished: false,
        })
    }
}

impl super::Decoder for WavDecoder {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn decode_packet(&mut self) -> SignalResult<Option<Vec<f32>>> {
        if self.finished {
            return Ok(None);
        }

        let count = PACKET_FRAMES * self.channels;
        let samples: Vec<f32> = match self.format {
            SampleFormat::Float => self
                .reader
                .samples::<f32>()
                .take(count)
                .collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                // Full scale of a signed integer sample of this width.
                let scale = (1u64 << (self.bits_per_sample - 1)) as f32;
                self.reader
                    .samples::<i32>()
                    .take(count)
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        if samples.len() < count {
            self.finished = true;
        }
        if samples.is_empty() {
            return Ok(None);
        }

        Ok(Some(samples))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use hound::{WavSpec, WavWriter};
    use tempfile::NamedTempFile;

    #[test]
    fn test_invalid_file() {
        let result = WavDecoder::from_file("/nonexistent/file.wav");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_float_wav() {
        let temp_file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(temp_file.path(), spec).unwrap();
        for i in 0..5000 {
            writer.write_sample(i as f32 / 5000.0).unwrap();
        }
        writer.finalize().unwrap();

        let mut decoder = WavDecoder::from_file(temp_file.path()).unwrap();
        assert_eq!(decoder.sample_rate(), 8000);
        assert_eq!(decoder.channels(), 1);

        let mut samples = Vec::new();
        while let Some(packet) = decoder.decode_packet().unwrap() {
            samples.extend(packet);
        }

        assert!(decoder.is_finished());
        assert_eq!(samples.len(), 5000);
        assert_eq!(samples[2500], 0.5);
    }

    #[test]
    fn test_decode_int_wav_scaling() {
        let temp_file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(temp_file.path(), spec).unwrap();
        writer.write_sample(-32768i16).unwrap();
        writer.write_sample(16384i16).unwrap();
        writer.finalize().unwrap();

        let mut decoder = WavDecoder::from_file(temp_file.path()).unwrap();
        let samples = decoder.decode_packet().unwrap().unwrap();

        assert_eq!(samples, vec![-1.0, 0.5]);
        assert!(decoder.decode_packet().unwrap().is_none());
    }
}
