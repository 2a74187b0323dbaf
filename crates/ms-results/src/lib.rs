//! ms-results: reading the simulator's receiver output.

pub mod counts;

pub use counts::{BinnedCount, ReceiverCounts, to_csv};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid count '{token}' at position {index}")]
    Parse { index: usize, token: String },

    #[error("Compression rate must be at least 1")]
    InvalidRate,
}
