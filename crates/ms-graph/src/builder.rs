//! Incremental graph builder.

use std::collections::HashMap;

use ms_core::{MsResult, Real, SegmentId};

use crate::error::GraphError;
use crate::graph::{FlowGraph, Segment};
use crate::validate;

/// Builder for constructing a flow graph incrementally.
///
/// Use `add_segment` and `connect` to describe the network, then call
/// `build()` to validate and freeze it into an immutable `FlowGraph`.
/// Connections may name targets that are never added as segments.
#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    segments: Vec<Segment>,
    next_id: u32,
    unknown_sources: Vec<SegmentId>,
}

impl FlowGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment and return its id.
    pub fn add_segment(&mut self, name: impl Into<String>, radius: Option<Real>) -> SegmentId {
        let id = SegmentId::from_index(self.next_id);
        self.next_id += 1;
        self.segments.push(Segment {
            id,
            name: name.into(),
            radius,
            outgoing: Vec::new(),
        });
        id
    }

    /// Append a downstream target to `from`.
    ///
    /// An unknown `from` id is remembered and rejected by `build()`.
    pub fn connect(&mut self, from: SegmentId, to: impl Into<String>) {
        match self.segments.get_mut(from.index() as usize) {
            Some(seg) => seg.outgoing.push(to.into()),
            None => self.unknown_sources.push(from),
        }
    }

    /// Append a downstream target to the segment called `from`.
    pub fn connect_by_name(&mut self, from: &str, to: impl Into<String>) -> MsResult<()> {
        let seg = self
            .segments
            .iter_mut()
            .find(|s| s.name == from)
            .ok_or_else(|| ms_core::MsError::InvalidArg {
                what: format!("unknown source segment '{}'", from),
            })?;
        seg.outgoing.push(to.into());
        Ok(())
    }

    /// Number of segments added so far.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Validate and freeze the graph.
    pub fn build(self) -> MsResult<FlowGraph> {
        if let Some(&segment) = self.unknown_sources.first() {
            return Err(GraphError::UnknownSource { segment }.into());
        }
        let by_name = validate::validate_segments(&self.segments)?;

        let (target_offsets, targets) = Self::build_adjacency(&self.segments, &by_name);

        validate::validate_adjacency(&self.segments, &target_offsets, &targets)?;

        Ok(FlowGraph {
            segments: self.segments,
            by_name,
            target_offsets,
            targets,
        })
    }

    /// Resolve each segment's outgoing names into segment ids, keeping order
    /// and skipping foreign targets and repeats.
    fn build_adjacency(
        segments: &[Segment],
        by_name: &HashMap<String, SegmentId>,
    ) -> (Vec<usize>, Vec<SegmentId>) {
        let mut offsets = Vec::with_capacity(segments.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);

        for seg in segments {
            let start = flat.len();
            for id in seg.outgoing.iter().filter_map(|name| by_name.get(name).copied()) {
                // a doubled wire is still one branch
                if !flat[start..].contains(&id) {
                    flat.push(id);
                }
            }
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
