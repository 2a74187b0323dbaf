//! ms-graph: pipe-segment graph for flow propagation.
//!
//! Provides:
//! - `Segment` / `FlowGraph` data structures
//! - Incremental builder with validation
//! - Resolved adjacency (segment targets vs. foreign targets such as sinks)
//!
//! # Example
//!
//! ```
//! use ms_graph::FlowGraphBuilder;
//!
//! let mut builder = FlowGraphBuilder::new();
//! let a = builder.add_segment("A", Some(2.0));
//! builder.add_segment("B", Some(1.0));
//! builder.connect(a, "B");
//! builder.connect(a, "sink1");
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! assert_eq!(graph.targets(a).len(), 1);
//! assert_eq!(graph.foreign_targets(a).collect::<Vec<_>>(), vec!["sink1"]);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub(crate) mod validate;

pub use builder::FlowGraphBuilder;
pub use error::GraphError;
pub use graph::{FlowGraph, Segment};
