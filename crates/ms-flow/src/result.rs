//! Resolved per-segment flow values.

use std::collections::BTreeMap;

use ms_core::{Real, SegmentId};
use ms_graph::FlowGraph;

use crate::seed::SeedPolicy;

/// Flow value for every segment reached from a seed.
///
/// Segments that were never reached are absent rather than zero.
/// Iteration is in segment id order, so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowResult {
    values: BTreeMap<SegmentId, Real>,
}

impl FlowResult {
    pub fn get(&self, id: SegmentId) -> Option<Real> {
        self.values.get(&id).copied()
    }

    pub fn get_by_name(&self, graph: &FlowGraph, name: &str) -> Option<Real> {
        graph.segment_id(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, Real)> + '_ {
        self.values.iter().map(|(&id, &v)| (id, v))
    }

    /// Pair each resolved value with its segment name.
    pub fn named<'g>(&self, graph: &'g FlowGraph) -> Vec<(&'g str, Real)> {
        self.iter()
            .filter_map(|(id, v)| graph.segment(id).map(|s| (s.name.as_str(), v)))
            .collect()
    }

    pub(crate) fn set(&mut self, id: SegmentId, value: Real) {
        self.values.insert(id, value);
    }

    pub(crate) fn write(&mut self, id: SegmentId, value: Real, policy: SeedPolicy) {
        let slot = self.values.entry(id).or_insert(0.0);
        *slot = policy.combine(*slot, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_core::Id;

    #[test]
    fn write_respects_policy() {
        let id = Id::from_index(0);
        let mut result = FlowResult::default();
        result.write(id, 2.0, SeedPolicy::Accumulate);
        result.write(id, 3.0, SeedPolicy::Accumulate);
        assert_eq!(result.get(id), Some(5.0));

        result.write(id, 1.5, SeedPolicy::Overwrite);
        assert_eq!(result.get(id), Some(1.5));
    }

    #[test]
    fn absent_is_not_zero() {
        let result = FlowResult::default();
        assert_eq!(result.get(Id::from_index(3)), None);
        assert!(!result.contains(Id::from_index(3)));
    }
}
