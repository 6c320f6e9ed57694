use super::{ProcessingReport, run_parallel};
use crate::container::EXTENSION;
use crate::decoder::load_waveform;
use crate::error::{SignalError, SignalResult};
use crate::extract::{PitchConfig, PitchExtractor, VolumeConfig, extract_volume};
use log::info;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the sidecar recording how a directory was produced
pub const ARGUMENTS_FILE: &str = "arguments.json";

#[derive(Serialize)]
struct Arguments<'a, C: Serialize> {
    inputs: &'a [PathBuf],
    output_directory: &'a Path,
    workers: usize,
    #[serde(flatten)]
    config: &'a C,
}

/// Container path for `source` inside `output_directory`, named after the source stem
pub fn output_path(output_directory: &Path, source: &Path) -> SignalResult<PathBuf> {
    let stem = source.file_stem().ok_or_else(|| {
        SignalError::ProcessingError(format!("{:?} has no file name", source))
    })?;

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(EXTENSION);
    Ok(output_directory.join(name))
}

/// Create the output directory and write the arguments sidecar
fn prepare_output<C: Serialize>(
    inputs: &[PathBuf],
    output_directory: &Path,
    workers: usize,
    config: &C,
) -> SignalResult<()> {
    fs::create_dir_all(output_directory)?;

    let arguments = Arguments {
        inputs,
        output_directory,
        workers,
        config,
    };
    let mut writer = BufWriter::new(File::create(output_directory.join(ARGUMENTS_FILE))?);
    serde_json::to_writer_pretty(&mut writer, &arguments)?;
    writer.flush()?;
    Ok(())
}

/// Extract volume contours for every input into `output_directory`
pub fn extract_volume_files(
    inputs: &[PathBuf],
    output_directory: &Path,
    config: &VolumeConfig,
    workers: usize,
) -> SignalResult<ProcessingReport> {
    config.validate()?;
    prepare_output(inputs, output_directory, workers, config)?;
    info!(
        "extracting volume from {} file(s) with {} worker(s)",
        inputs.len(),
        workers
    );

    Ok(run_parallel(inputs.to_vec(), workers, |path| {
        let waveform = load_waveform(path, config.sampling_rate)?;
        let volume = extract_volume(&waveform, config)?;
        let output = output_path(output_directory, path)?;
        volume.save(&output)?;
        Ok(output)
    }))
}

/// Extract f0 contours for every input into `output_directory`
pub fn extract_f0_files(
    inputs: &[PathBuf],
    output_directory: &Path,
    config: &PitchConfig,
    extractor: &dyn PitchExtractor,
    workers: usize,
) -> SignalResult<ProcessingReport> {
    config.validate()?;
    prepare_output(inputs, output_directory, workers, config)?;
    info!(
        "extracting f0 from {} file(s) with {} worker(s)",
        inputs.len(),
        workers
    );

    Ok(run_parallel(inputs.to_vec(), workers, |path| {
        let waveform = load_waveform(path, config.sampling_rate)?;
        let f0 = extractor.extract(&waveform, config)?;
        let output = output_path(output_directory, path)?;
        f0.save(&output)?;
        Ok(output)
    }))
}
