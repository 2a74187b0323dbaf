//! Seed injections and propagation options.

use ms_core::Real;
use serde::{Deserialize, Serialize};

/// An externally injected flow rate arriving at a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub segment: String,
    pub flow: Real,
}

impl Seed {
    pub fn new(segment: impl Into<String>, flow: Real) -> Self {
        Self {
            segment: segment.into(),
            flow,
        }
    }
}

/// How values that land on an already resolved segment are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Last write wins: a repeated seed replaces the earlier one, and a later
    /// walk replaces values written by earlier walks.
    #[default]
    Overwrite,
    /// Repeated seeds on one segment are summed, and the contributions of
    /// separate walks are superposed.
    Accumulate,
}

impl SeedPolicy {
    pub fn label(self) -> &'static str {
        match self {
            SeedPolicy::Overwrite => "overwrite",
            SeedPolicy::Accumulate => "accumulate",
        }
    }

    pub(crate) fn combine(self, existing: Real, incoming: Real) -> Real {
        match self {
            SeedPolicy::Overwrite => incoming,
            SeedPolicy::Accumulate => existing + incoming,
        }
    }
}

impl std::str::FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(SeedPolicy::Overwrite),
            "accumulate" => Ok(SeedPolicy::Accumulate),
            other => Err(format!(
                "unknown seed policy '{}' (expected overwrite or accumulate)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationOptions {
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

impl PropagationOptions {
    pub fn with_policy(seed_policy: SeedPolicy) -> Self {
        Self { seed_policy }
    }
}
