//! Per-step receiver hit counts.
//!
//! The simulator writes one comma separated line: the number of molecules
//! that reached a receiver at each simulation step.

use std::path::Path;

use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiverCounts {
    pub samples: Vec<u64>,
}

/// Sum of `rate` consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinnedCount {
    pub time_step: usize,
    pub count: u64,
}

impl ReceiverCounts {
    /// Parse `"0, 3,1"`. An empty input is an empty series and one trailing
    /// comma is tolerated.
    pub fn parse(text: &str) -> ResultsResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        let text = text.strip_suffix(',').unwrap_or(text);

        let samples = text
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token.parse::<u64>().map_err(|_| ResultsError::Parse {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<ResultsResult<Vec<_>>>()?;
        Ok(Self { samples })
    }

    pub fn load(path: &Path) -> ResultsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let counts = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), samples = counts.len(), "loaded receiver counts");
        Ok(counts)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.samples.iter().sum()
    }

    /// Compress the series into sums of `rate` samples. A trailing group
    /// shorter than `rate` is dropped.
    pub fn bin(&self, rate: usize) -> ResultsResult<Vec<BinnedCount>> {
        if rate == 0 {
            return Err(ResultsError::InvalidRate);
        }
        let bins = self
            .samples
            .chunks_exact(rate)
            .enumerate()
            .map(|(time_step, chunk)| BinnedCount {
                time_step,
                count: chunk.iter().sum(),
            })
            .collect::<Vec<_>>();
        let dropped = self.samples.len() % rate;
        if dropped > 0 {
            tracing::debug!(dropped, rate, "incomplete trailing group left out");
        }
        Ok(bins)
    }
}

pub fn to_csv(bins: &[BinnedCount]) -> String {
    let mut out = String::from("time_step,count\n");
    for bin in bins {
        out.push_str(&format!("{},{}\n", bin.time_step, bin.count));
    }
    out
}
