//! Graph-specific error types.

use ms_core::{MsError, SegmentId};

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two segments share a name.
    DuplicateSegment { name: String },

    /// A segment was given an empty name.
    EmptyName { segment: SegmentId },

    /// A connection starts from a segment that was never added.
    UnknownSource { segment: SegmentId },

    /// Segment ids are not contiguous with their storage order.
    NonContiguousId { segment: SegmentId, position: usize },

    /// Adjacency offsets do not cover the target list.
    InconsistentAdjacency { segment: SegmentId },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateSegment { name } => {
                write!(f, "Segment name '{}' is used more than once", name)
            }
            GraphError::EmptyName { segment } => {
                write!(f, "Segment {} has an empty name", segment)
            }
            GraphError::UnknownSource { segment } => {
                write!(f, "Connection starts from non-existent segment {}", segment)
            }
            GraphError::NonContiguousId { segment, position } => {
                write!(f, "Segment {} stored at position {}", segment, position)
            }
            GraphError::InconsistentAdjacency { segment } => {
                write!(f, "Adjacency list of segment {} is inconsistent", segment)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for MsError {
    fn from(err: GraphError) -> Self {
        MsError::Invariant {
            what: err.to_string(),
        }
    }
}
