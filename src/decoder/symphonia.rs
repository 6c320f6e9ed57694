use crate::error::{SignalError, SignalResult};
use log::warn;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based audio decoder
pub struct SymphoniaDecoder {
    /// Current reader for the audio source
    reader: Box<dyn FormatReader>,
    /// Track information
    track_id: u32,
    /// Sample rate
    sample_rate: u32,
    /// Number of channels
    channels: usize,
    /// Whether decoding is finished
    finished: bool,
    /// Current decoder state
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
}

impl SymphoniaDecoder {
    /// Create decoder from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> SignalResult<Self> {
        let path = path.as_ref();

        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        // Probe the file to detect format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| SignalError::UnsupportedFormat(e.to_string()))?;

        let reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| SignalError::DecodeError("No audio track found".to_string()))?
            .clone();

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| SignalError::DecodeError("Unknown sample rate".to_string()))?;

        let channels = codec_params
            .channels
            .map(|channels| channels.count())
            .ok_or_else(|| SignalError::DecodeError("Unknown channel count".to_string()))?;

        let decoder =
            symphonia::default::get_codecs().make(codec_params, &DecoderOptions::default())?;

        Ok(SymphoniaDecoder {
            reader,
            track_id,
            sample_rate,
            channels,
            finished: false,
            decoder,
        })
    }
}

impl super::Decoder for SymphoniaDecoder {
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

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            // Only process packets from our audio track
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            if spec.channels.count() != self.channels {
                return Err(SignalError::DecodeError(format!(
                    "channel count changed from {} to {}",
                    self.channels,
                    spec.channels.count()
                )));
            }

            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buffer.copy_interleaved_ref(decoded);

            if buffer.samples().is_empty() {
                continue;
            }

            return Ok(Some(buffer.samples().to_vec()));
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
