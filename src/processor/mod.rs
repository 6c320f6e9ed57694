//! Batch extraction over many files

/// Extraction jobs over input files
pub mod jobs;
/// Worker pool
pub mod pool;

pub use jobs::{ARGUMENTS_FILE, extract_f0_files, extract_volume_files, output_path};
pub use pool::run_parallel;

use crate::error::SignalError;
use std::path::PathBuf;

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct ProcessingReport {
    /// Containers written, in completion order
    pub written: Vec<PathBuf>,
    /// Input files that failed with their error
    pub failed: Vec<(PathBuf, SignalError)>,
}

impl ProcessingReport {
    /// Check that no file failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of files attempted
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}
