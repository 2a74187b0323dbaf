//! Error types for strict propagation callers.

use ms_core::MsError;
use thiserror::Error;

/// Raised only when a caller asks for a propagation without diagnostics.
/// `propagate` itself never fails.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Seeds reference unknown segments: {names:?}")]
    UnknownSeeds { names: Vec<String> },

    #[error("Seeds carry non-finite flow values: {names:?}")]
    InvalidSeeds { names: Vec<String> },

    #[error("Segments have no usable radius: {names:?}")]
    MalformedRadius { names: Vec<String> },
}

pub type StrictResult<T> = Result<T, FlowError>;

impl From<FlowError> for MsError {
    fn from(e: FlowError) -> Self {
        MsError::InvalidArg {
            what: e.to_string(),
        }
    }
}
