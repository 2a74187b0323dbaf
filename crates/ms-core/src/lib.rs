//! ms-core: shared foundation for the molecular-simulation config tooling.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact ids for graph objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

pub use error::{MsError, MsResult};
pub use ids::*;
pub use numeric::*;
