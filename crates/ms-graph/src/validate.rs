//! Graph validation logic.

use std::collections::HashMap;

use ms_core::{MsResult, SegmentId};

use crate::error::GraphError;
use crate::graph::Segment;

/// Check ids and names and return the name index.
pub(crate) fn validate_segments(segments: &[Segment]) -> MsResult<HashMap<String, SegmentId>> {
    let mut by_name = HashMap::with_capacity(segments.len());

    for (position, seg) in segments.iter().enumerate() {
        if seg.id.index() as usize != position {
            return Err(GraphError::NonContiguousId {
                segment: seg.id,
                position,
            }
            .into());
        }

        if seg.name.trim().is_empty() {
            return Err(GraphError::EmptyName { segment: seg.id }.into());
        }

        if by_name.insert(seg.name.clone(), seg.id).is_some() {
            return Err(GraphError::DuplicateSegment {
                name: seg.name.clone(),
            }
            .into());
        }
    }

    Ok(by_name)
}

/// Validate the resolved adjacency lists.
pub(crate) fn validate_adjacency(
    segments: &[Segment],
    target_offsets: &[usize],
    targets: &[SegmentId],
) -> MsResult<()> {
    if target_offsets.len() != segments.len() + 1 {
        let segment = segments.first().map_or(SegmentId::from_index(0), |s| s.id);
        return Err(GraphError::InconsistentAdjacency { segment }.into());
    }

    for seg in segments {
        let idx = seg.id.index() as usize;
        let (start, end) = (target_offsets[idx], target_offsets[idx + 1]);
        if start > end || end > targets.len() {
            return Err(GraphError::InconsistentAdjacency { segment: seg.id }.into());
        }
        // every resolved target must be a real segment
        if targets[start..end]
            .iter()
            .any(|t| t.index() as usize >= segments.len())
        {
            return Err(GraphError::InconsistentAdjacency { segment: seg.id }.into());
        }
    }

    Ok(())
}
