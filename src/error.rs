use std::io;
use thiserror::Error;

/// Result type for signal operations
pub type SignalResult<T> = Result<T, SignalError>;

/// Error types for sampled signals, their containers and the extractors producing them
#[derive(Error, Debug)]
pub enum SignalError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed signal container
    #[error("Container format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Waveform resampling failed
    #[error("Resampling error: {0}")]
    ResamplingError(String),

    /// Target rate is not an integer multiple of the signal rate
    #[error("Incompatible rate: {target} is not an integer multiple of {rate}")]
    IncompatibleRate {
        /// Requested rate
        target: f64,
        /// Rate of the signal
        rate: f64,
    },

    /// Head/tail frames used for padding estimation are not uniform
    #[error("Inconsistent padding at frame {index}: expected {expected:?}, found {found:?}")]
    InconsistentPadding {
        /// Frame index in the signal
        index: usize,
        /// The first frame of the signal
        expected: Vec<f32>,
        /// The differing frame
        found: Vec<f32>,
    },

    /// Operation requires at least one frame
    #[error("Signal has no frames")]
    EmptySignal,

    /// Sample cannot be stored in a container (NaN or infinite)
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample {
        /// Index into the flat frame buffer
        index: usize,
    },

    /// Rate is not a finite positive number
    #[error("Invalid rate: {rate}")]
    InvalidRate {
        /// The invalid rate
        rate: f64,
    },

    /// Sample buffer does not form a rectangular N x D array
    #[error("Invalid shape: {len} values cannot form frames of width {width}")]
    InvalidShape {
        /// Number of values
        len: usize,
        /// Frame width
        width: usize,
    },

    /// Frame width does not match the signal width
    #[error("Width mismatch: expected {expected}, got {got}")]
    WidthMismatch {
        /// Expected frame width
        expected: usize,
        /// Got frame width
        got: usize,
    },

    /// Split keypoint is non-finite, negative, out of range or out of order
    #[error("Invalid keypoint #{position}: {seconds}s")]
    InvalidKeypoint {
        /// Position of the keypoint in the input list
        position: usize,
        /// Keypoint in seconds
        seconds: f64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Feature processing error
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

impl From<symphonia::core::errors::Error> for SignalError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(e) => SignalError::Io(e),
            symphonia::core::errors::Error::Unsupported(what) => {
                SignalError::UnsupportedFormat(what.to_string())
            }
            e => SignalError::DecodeError(e.to_string()),
        }
    }
}

impl From<hound::Error> for SignalError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => SignalError::Io(e),
            e => SignalError::DecodeError(e.to_string()),
        }
    }
}
