//! Flow distribution over pipe-segment graphs.
//!
//! Seeds inject a volumetric flow rate at chosen segments. From each seed the
//! flow is split across every junction in proportion to the fourth power of
//! the branch radii (laminar Hagen-Poiseuille conductance), walking
//! downstream until terminal segments are reached. A per-walk visited set
//! bounds the work on graphs that loop back on themselves.

pub mod diagnostics;
pub mod error;
pub mod propagate;
pub mod result;
pub mod seed;

pub use diagnostics::FlowDiagnostics;
pub use error::{FlowError, StrictResult};
pub use propagate::{Propagation, propagate};
pub use result::FlowResult;
pub use seed::{PropagationOptions, Seed, SeedPolicy};
