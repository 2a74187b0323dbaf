//! Non-fatal findings collected during propagation.

use ms_core::SegmentId;

use crate::error::FlowError;
use crate::seed::Seed;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowDiagnostics {
    /// Seed targets that are not segments of the graph.
    pub unknown_seeds: Vec<String>,
    /// Seeds whose flow value is NaN or infinite.
    pub invalid_seeds: Vec<Seed>,
    /// Segments whose radius is missing, non-finite or negative. They take
    /// no share of any junction split.
    pub malformed_radius: Vec<SegmentId>,
    /// Junctions whose branch weights sum to zero; nothing is distributed.
    pub degenerate_junctions: Vec<SegmentId>,
    /// Targets skipped because the current walk had already resolved them
    /// (cycles, or merges reached a second time).
    pub cycle_truncations: usize,
}

impl FlowDiagnostics {
    /// True when nothing worth reporting happened. Cycle truncations do not
    /// count; they are an expected bound, not a data problem.
    pub fn is_clean(&self) -> bool {
        self.unknown_seeds.is_empty()
            && self.invalid_seeds.is_empty()
            && self.malformed_radius.is_empty()
            && self.degenerate_junctions.is_empty()
    }

    pub(crate) fn note_degenerate(&mut self, id: SegmentId) {
        if !self.degenerate_junctions.contains(&id) {
            self.degenerate_junctions.push(id);
        }
    }

    /// First problem that a strict caller should refuse to continue with.
    pub fn first_error(&self, graph: &ms_graph::FlowGraph) -> Option<FlowError> {
        if !self.unknown_seeds.is_empty() {
            return Some(FlowError::UnknownSeeds {
                names: self.unknown_seeds.clone(),
            });
        }
        if !self.invalid_seeds.is_empty() {
            return Some(FlowError::InvalidSeeds {
                names: self.invalid_seeds.iter().map(|s| s.segment.clone()).collect(),
            });
        }
        if !self.malformed_radius.is_empty() {
            return Some(FlowError::MalformedRadius {
                names: self
                    .malformed_radius
                    .iter()
                    .filter_map(|&id| graph.segment(id).map(|s| s.name.clone()))
                    .collect(),
            });
        }
        None
    }
}
