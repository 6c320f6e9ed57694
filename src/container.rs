//! On-disk container for a single [`SampledSignal`]
//!
//! A container is a JSON object with exactly two keys: `array`, the frames as
//! a list of rows (or a flat list for a width-1 track), and `rate`.
//!
//! Values are read as `f32`: integers above 2^24 and `f64` values written by
//! other producers are rounded to the nearest `f32` on load. Only finite,
//! non-empty signals can be written.

use crate::core::SampledSignal;
use crate::error::{SignalError, SignalResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Extension used for signal containers
pub const EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ArrayData {
    Matrix(Vec<Vec<f32>>),
    Vector(Vec<f32>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Container {
    array: ArrayData,
    rate: f64,
}

impl Container {
    fn from_signal(signal: &SampledSignal) -> Self {
        Container {
            array: ArrayData::Matrix(signal.frames().map(<[f32]>::to_vec).collect()),
            rate: signal.rate(),
        }
    }

    fn into_signal(self) -> SignalResult<SampledSignal> {
        // A bare vector is a width-1 track.
        let frames = match self.array {
            ArrayData::Matrix(rows) => rows,
            ArrayData::Vector(values) => values.into_iter().map(|v| vec![v]).collect(),
        };

        if frames.is_empty() {
            return Err(SignalError::EmptySignal);
        }
        if frames[0].is_empty() {
            return Err(SignalError::InvalidShape {
                len: 0,
                width: 0,
            });
        }

        SampledSignal::from_frames(frames, self.rate)
    }
}

/// Read a signal from a container file
pub fn read(path: &Path) -> SignalResult<SampledSignal> {
    let reader = BufReader::new(File::open(path)?);
    let container: Container = serde_json::from_reader(reader)?;
    let signal = container.into_signal()?;

    debug!(
        "loaded {:?}: {} frames x {} at {} Hz",
        path,
        signal.len(),
        signal.width(),
        signal.rate()
    );

    Ok(signal)
}

/// Write a signal to a container file, replacing any existing file
pub fn write(path: &Path, signal: &SampledSignal) -> SignalResult<()> {
    if signal.is_empty() {
        return Err(SignalError::EmptySignal);
    }
    // JSON has no NaN or infinity.
    if let Some(index) = signal.samples().iter().position(|s| !s.is_finite()) {
        return Err(SignalError::NonFiniteSample { index });
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &Container::from_signal(signal))?;
    writer.flush()?;

    debug!("saved {:?}: {} frames", path, signal.len());
    Ok(())
}
