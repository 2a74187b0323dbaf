//! Imported network: propagation graph plus the config it will be written as.

use ms_flow::{FlowResult, Seed};
use ms_graph::FlowGraph;
use serde::{Deserialize, Serialize};

use crate::schema::NetworkConfig;
use crate::warnings::ImportWarning;

/// Fallbacks for fields the editor left empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportDefaults {
    pub pipe_length: f64,
    pub pipe_radius: f64,
    pub particle_count: u32,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            pipe_length: 0.1,
            pipe_radius: 0.01,
            particle_count: 0,
        }
    }
}

/// Result of importing an editor export.
///
/// Graph segment names are the generated pipe names, so flow values map
/// straight onto `config.pipes` keys.
#[derive(Debug, Clone)]
pub struct ImportedNetwork {
    pub graph: FlowGraph,
    pub seeds: Vec<Seed>,
    pub config: NetworkConfig,
    pub warnings: Vec<ImportWarning>,
}

impl ImportedNetwork {
    /// Write resolved flows onto their pipes. Returns how many pipes got one.
    pub fn apply_flows(&mut self, result: &FlowResult) -> usize {
        let mut applied = 0;
        for (name, flow) in result.named(&self.graph) {
            if let Some(pipe) = self.config.pipes.get_mut(name) {
                pipe.flow = Some(flow);
                applied += 1;
            }
        }
        applied
    }
}
