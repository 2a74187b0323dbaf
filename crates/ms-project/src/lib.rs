//! ms-project: simulator configuration formats and editor importers.
//!
//! - `schema`: the network YAML document the simulator loads
//! - `node_red`: flow-editor JSON export → network
//! - `graphml`: diagram GraphML → network
//! - `header`: flow-editor settings → `config.h`

pub mod graphml;
pub mod header;
pub mod network;
pub mod node_red;
pub mod schema;
pub mod validate;
pub mod values;
pub mod warnings;

pub use graphml::GraphmlDocument;
pub use header::{HeaderConfig, SimulationSettings};
pub use network::{ImportDefaults, ImportedNetwork};
pub use node_red::{NodeRedExport, NodeRedKind, NodeRedRecord};
pub use schema::*;
pub use validate::{ValidationError, validate_network};
pub use warnings::ImportWarning;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Graph error: {0}")]
    Graph(#[from] ms_core::MsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<NetworkConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: NetworkConfig = serde_yaml::from_str(&content)?;
    validate_network(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &NetworkConfig) -> ProjectResult<()> {
    let content = to_yaml_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn to_yaml_string(config: &NetworkConfig) -> ProjectResult<String> {
    validate_network(config)?;
    Ok(serde_yaml::to_string(config)?)
}
