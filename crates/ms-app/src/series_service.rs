//! Receiver output series.

use std::path::Path;

use ms_results::{BinnedCount, ReceiverCounts, to_csv};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverSeries {
    pub samples: usize,
    pub rate: usize,
    pub bins: Vec<BinnedCount>,
}

impl ReceiverSeries {
    pub fn to_csv(&self) -> String {
        to_csv(&self.bins)
    }
}

/// Load a receiver output file and compress it by `rate` steps per bin.
pub fn receiver_series(path: &Path, rate: usize) -> AppResult<ReceiverSeries> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::InputRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let counts = ReceiverCounts::parse(&text)?;
    let bins = counts.bin(rate)?;
    Ok(ReceiverSeries {
        samples: counts.len(),
        rate,
        bins,
    })
}

/// Write the series as `time_step,count` CSV.
pub fn write_series(path: &Path, series: &ReceiverSeries) -> AppResult<()> {
    std::fs::write(path, series.to_csv()).map_err(|e| AppError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
