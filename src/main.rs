//! Acoustic Features Command Line Interface
//!
//! Batch extraction of f0 and volume contours, plus inspection and splitting
//! of signal containers.

use acoustic_features::SampledSignal;
use acoustic_features::extract::{Autocorrelation, PitchConfig, VolumeConfig};
use acoustic_features::processor::{self, ProcessingReport};
use acoustic_features::{SignalError, SignalResult};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "acoustic-features")]
#[command(about = "Frame-level acoustic feature extraction", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract f0 contours
    ExtractF0 {
        /// Input audio files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (created if absent)
        #[arg(short, long, value_name = "DIR")]
        output_directory: PathBuf,

        /// Sample rate the audio is loaded at
        #[arg(short, long)]
        sampling_rate: u32,

        /// Frame period in milliseconds
        #[arg(long, default_value_t = 5.0)]
        frame_period: f64,

        /// Lowest f0 in Hz
        #[arg(long, default_value_t = 71.0)]
        f0_floor: f64,

        /// Highest f0 in Hz
        #[arg(long, default_value_t = 800.0)]
        f0_ceil: f64,

        /// Store a voiced/unvoiced flag next to f0
        #[arg(long)]
        with_vuv: bool,

        /// Worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Extract log-power volume contours
    ExtractVolume {
        /// Input audio files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (created if absent)
        #[arg(short, long, value_name = "DIR")]
        output_directory: PathBuf,

        /// Sample rate the audio is loaded at
        #[arg(short, long)]
        sampling_rate: u32,

        /// Analysis window in samples
        #[arg(long, default_value_t = 800)]
        frame_length: usize,

        /// Hop in samples; must divide the sample rate
        #[arg(long, default_value_t = 200)]
        hop_length: usize,

        /// Dynamic range kept below the loudest frame, in dB
        #[arg(long, default_value_t = 80.0)]
        top_db: f32,

        /// Map the kept range onto [0, 1]
        #[arg(short, long)]
        normalize: bool,

        /// Worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print the shape and padding of a signal container
    Inspect {
        /// Signal container
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Split a signal container at keypoints given in seconds
    Split {
        /// Signal container
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory (created if absent)
        #[arg(short, long, value_name = "DIR")]
        output_directory: PathBuf,

        /// Ascending keypoints in seconds
        #[arg(short, long, value_delimiter = ',', required = true)]
        keypoints: Vec<f64>,
    },
}

fn finish(report: ProcessingReport) -> SignalResult<()> {
    info!(
        "{} of {} file(s) written",
        report.written.len(),
        report.total()
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(SignalError::ProcessingError(format!(
            "{} of {} file(s) failed",
            report.failed.len(),
            report.total()
        )))
    }
}

fn inspect(input: &Path) -> SignalResult<()> {
    let signal = SampledSignal::load(input)?;

    println!("File: {:?}", input);
    println!("  Frames: {}", signal.len());
    println!("  Width: {}", signal.width());
    println!("  Rate: {} Hz", signal.rate());
    println!("  Duration: {:.3} s", signal.duration().as_secs_f64());
    println!("  Constant: {}", signal.all_same()?);
    match signal.estimate_padding_value() {
        Ok(value) => println!("  Padding value: {:?}", value),
        Err(SignalError::InconsistentPadding { index, .. }) => {
            println!("  Padding value: none (frame {} differs)", index)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn split(input: &Path, output_directory: &Path, keypoints: &[f64]) -> SignalResult<()> {
    let signal = SampledSignal::load(input)?;
    let segments = signal.split(keypoints)?;
    std::fs::create_dir_all(output_directory)?;

    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("segment");
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            warn!("segment {} is empty, skipping", i);
            continue;
        }
        let output = output_directory.join(format!("{}_{}.json", stem, i));
        segment.save(&output)?;
        info!("{:?}: {} frames", output, segment.len());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("acoustic-features {}", acoustic_features::VERSION);

    match cli.command {
        Commands::ExtractF0 {
            inputs,
            output_directory,
            sampling_rate,
            frame_period,
            f0_floor,
            f0_ceil,
            with_vuv,
            jobs,
        } => {
            let config = PitchConfig {
                sampling_rate,
                frame_period,
                f0_floor,
                f0_ceil,
                with_vuv,
            };
            let workers = jobs.unwrap_or_else(num_cpus::get);
            let report = processor::extract_f0_files(
                &inputs,
                &output_directory,
                &config,
                &Autocorrelation::default(),
                workers,
            )?;
            finish(report)?;
        }
        Commands::ExtractVolume {
            inputs,
            output_directory,
            sampling_rate,
            frame_length,
            hop_length,
            top_db,
            normalize,
            jobs,
        } => {
            let config = VolumeConfig {
                sampling_rate,
                frame_length,
                hop_length,
                top_db,
                normalize,
            };
            let workers = jobs.unwrap_or_else(num_cpus::get);
            let report =
                processor::extract_volume_files(&inputs, &output_directory, &config, workers)?;
            finish(report)?;
        }
        Commands::Inspect { input } => inspect(&input)?,
        Commands::Split {
            input,
            output_directory,
            keypoints,
        } => split(&input, &output_directory, &keypoints)?,
    }

    Ok(())
}
