//! Shared service layer for the molsim config tools.
//!
//! Each service reads its inputs, runs the import / propagation / formatting
//! step and hands back plain data; the CLI only parses arguments and prints.

pub mod convert_service;
pub mod error;
pub mod series_service;

pub use convert_service::{
    Conversion, ConversionSummary, ConvertOptions, graphml_to_network, node_red_to_header,
    node_red_to_network, parse_seed, write_header, write_network,
};
pub use error::{AppError, AppResult};
pub use series_service::{ReceiverSeries, receiver_series, write_series};
