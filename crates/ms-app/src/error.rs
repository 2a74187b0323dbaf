//! Error types for the ms-app service layer.

use std::path::PathBuf;

/// Unified error for the command line front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read input file: {path}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Flow propagation rejected: {0}")]
    Flow(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<ms_project::ProjectError> for AppError {
    fn from(err: ms_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ms_flow::FlowError> for AppError {
    fn from(err: ms_flow::FlowError) -> Self {
        AppError::Flow(err.to_string())
    }
}

impl From<ms_results::ResultsError> for AppError {
    fn from(err: ms_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
