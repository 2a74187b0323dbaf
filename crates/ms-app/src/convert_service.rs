//! Editor export → network YAML / `config.h` conversions.

use std::path::Path;

use ms_flow::{Propagation, PropagationOptions, Seed, propagate};
use ms_graph::FlowGraph;
use ms_project::{
    GraphmlDocument, HeaderConfig, ImportDefaults, ImportWarning, ImportedNetwork, NetworkConfig,
    NodeRedExport,
};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub propagation: PropagationOptions,
    pub defaults: ImportDefaults,
    /// Refuse to convert when propagation reports unknown seeds, invalid
    /// seed values or unusable radii.
    pub strict: bool,
}

/// A converted network with its resolved flows written onto the pipes.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub graph: FlowGraph,
    pub config: NetworkConfig,
    pub flows: Propagation,
    pub warnings: Vec<ImportWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub pipes: usize,
    pub sinks: usize,
    pub with_flow: usize,
    pub warnings: usize,
    pub cycle_truncations: usize,
}

impl Conversion {
    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            pipes: self.config.pipes.len(),
            sinks: self.config.sinks.len(),
            with_flow: self.flows.result.len(),
            warnings: self.warnings.len(),
            cycle_truncations: self.flows.diagnostics.cycle_truncations,
        }
    }
}

fn read_input(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| AppError::InputRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_output(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|e| AppError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Import a Node-RED export and resolve the flow on every reachable pipe.
pub fn node_red_to_network(path: &Path, options: &ConvertOptions) -> AppResult<Conversion> {
    let export = NodeRedExport::from_json_str(&read_input(path)?)?;
    let network = export.to_network(&options.defaults)?;
    finish(network, options)
}

/// Import a GraphML diagram. Diagrams carry no flow sources, so `seeds`
/// name the GraphML node ids to inject at.
pub fn graphml_to_network(
    path: &Path,
    seeds: &[Seed],
    options: &ConvertOptions,
) -> AppResult<Conversion> {
    let doc = GraphmlDocument::parse_str(&read_input(path)?)?;
    let mut network = doc.to_network()?;
    network.seeds = seeds.to_vec();
    finish(network, options)
}

fn finish(mut network: ImportedNetwork, options: &ConvertOptions) -> AppResult<Conversion> {
    let flows = propagate(&network.graph, &network.seeds, &options.propagation);
    if options.strict {
        flows.ensure_clean(&network.graph)?;
    }
    let applied = network.apply_flows(&flows.result);
    tracing::info!(
        pipes = network.config.pipes.len(),
        with_flow = applied,
        policy = options.propagation.seed_policy.label(),
        "network converted"
    );

    Ok(Conversion {
        graph: network.graph,
        config: network.config,
        flows,
        warnings: network.warnings,
    })
}

pub fn node_red_to_header(path: &Path) -> AppResult<HeaderConfig> {
    let export = NodeRedExport::from_json_str(&read_input(path)?)?;
    Ok(HeaderConfig::from_export(&export)?)
}

/// Validate and write the network YAML.
pub fn write_network(path: &Path, config: &NetworkConfig) -> AppResult<()> {
    let yaml = ms_project::to_yaml_string(config)?;
    write_output(path, &yaml)
}

pub fn write_header(path: &Path, header: &HeaderConfig) -> AppResult<()> {
    write_output(path, &header.render())
}

/// Parse a `SEGMENT=FLOW` seed argument.
pub fn parse_seed(text: &str) -> AppResult<Seed> {
    let (segment, flow) = text
        .split_once('=')
        .ok_or_else(|| AppError::InvalidInput(format!("seed '{}' is not SEGMENT=FLOW", text)))?;
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(AppError::InvalidInput(format!("seed '{}' has no segment", text)));
    }
    let flow = flow
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidInput(format!("seed '{}' has a non-numeric flow", text)))?;
    let flow = ms_core::ensure_finite(flow, "seed flow")
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok(Seed::new(segment, flow))
}
