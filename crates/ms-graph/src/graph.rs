//! Core graph data structures.

use std::collections::HashMap;

use ms_core::{Real, SegmentId};

/// A pipe segment: the unit flow is distributed over.
///
/// `radius` is `None` when the upstream record had no usable radius; such a
/// segment still takes part in the graph but carries no conductance.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub name: String,
    pub radius: Option<Real>,
    /// Downstream target names in wiring order. May name things that are not
    /// segments (sinks, receivers); those are kept for serialization only.
    pub outgoing: Vec<String>,
}

impl Segment {
    /// True when the segment has no outgoing connections at all.
    pub fn is_terminal(&self) -> bool {
        self.outgoing.is_empty()
    }
}

/// Validated, immutable pipe-segment graph.
///
/// Stores:
/// - All segments in a vector indexed by their ids.
/// - Compact adjacency: for each segment, the targets that are themselves
///   segments, in wiring order.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    pub(crate) segments: Vec<Segment>,
    pub(crate) by_name: HashMap<String, SegmentId>,

    /// Segment i's resolved targets are `targets[target_offsets[i]..target_offsets[i+1]]`.
    pub(crate) target_offsets: Vec<usize>,
    pub(crate) targets: Vec<SegmentId>,
}

impl FlowGraph {
    /// Return all segments in insertion order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get a segment by id (None if out of bounds).
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index() as usize)
    }

    /// Look up a segment id by name.
    pub fn segment_id(&self, name: &str) -> Option<SegmentId> {
        self.by_name.get(name).copied()
    }

    /// Look up a segment by name.
    pub fn by_name(&self, name: &str) -> Option<&Segment> {
        self.segment_id(name).and_then(|id| self.segment(id))
    }

    /// Downstream targets of `id` that are segments, in wiring order.
    pub fn targets(&self, id: SegmentId) -> &[SegmentId] {
        let idx = id.index() as usize;
        if idx >= self.segments.len() {
            return &[];
        }
        let start = self.target_offsets[idx];
        let end = self.target_offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Downstream target names of `id` that are not segments.
    pub fn foreign_targets(&self, id: SegmentId) -> impl Iterator<Item = &str> + '_ {
        self.segment(id)
            .into_iter()
            .flat_map(|s| s.outgoing.iter())
            .filter(|name| !self.by_name.contains_key(name.as_str()))
            .map(String::as_str)
    }

    /// Upstream segments feeding `id`, in segment order.
    pub fn sources(&self, id: SegmentId) -> Vec<SegmentId> {
        self.segments
            .iter()
            .filter(|s| self.targets(s.id).contains(&id))
            .map(|s| s.id)
            .collect()
    }
}
