//! Network configuration schema read by the simulator.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Top-level network document: pipes and sinks keyed by their generated name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    #[serde(default)]
    pub pipes: IndexMap<String, PipeDef>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub sinks: IndexMap<String, SinkDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeDef {
    pub length: f64,
    pub radius: f64,
    #[serde(default)]
    pub particle_count: u32,
    #[serde(default)]
    pub left_connections: Vec<String>,
    #[serde(default)]
    pub right_connections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<ReceiverSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emitters: Vec<EmitterSpec>,
}

impl PipeDef {
    pub fn new(length: f64, radius: f64) -> Self {
        Self {
            length,
            radius,
            particle_count: 0,
            left_connections: Vec::new(),
            right_connections: Vec::new(),
            flow: None,
            receivers: Vec::new(),
            emitters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SinkDef {
    #[serde(default)]
    pub left_connections: Vec<String>,
}

/// Receiver attached to a pipe. Positions are cylindrical (`r`, `theta`, `z`)
/// in the pipe frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ReceiverSpec {
    #[serde(rename = "Sphere type")]
    Sphere {
        radius: f64,
        #[serde(default)]
        z: f64,
        #[serde(default)]
        r: f64,
        #[serde(default)]
        theta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    #[serde(rename = "Ring type")]
    Ring {
        #[serde(default)]
        z: f64,
        #[serde(default)]
        r: f64,
        #[serde(default)]
        theta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ReceiverSpec {
    pub const SPHERE_LABEL: &'static str = "Sphere type";
    pub const RING_LABEL: &'static str = "Ring type";

    pub fn type_label(&self) -> &'static str {
        match self {
            ReceiverSpec::Sphere { .. } => Self::SPHERE_LABEL,
            ReceiverSpec::Ring { .. } => Self::RING_LABEL,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ReceiverSpec::Sphere { name, .. } | ReceiverSpec::Ring { name, .. } => name.as_deref(),
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        match self {
            ReceiverSpec::Sphere { name, .. } | ReceiverSpec::Ring { name, .. } => {
                *name = Some(value.into())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmitterSpec {
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub theta: f64,
    pub emitter_pattern: EmissionPattern,
    #[serde(default)]
    pub emitter_pattern_type: PatternType,
}

/// Per-frame emission counts. Written as a comma separated string, which is
/// what the simulator's loader splits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmissionPattern(pub Vec<u32>);

impl EmissionPattern {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&n| u64::from(n)).sum()
    }

    /// Parse `"3,0, 1"`. Returns the accepted counts and the rejected tokens.
    /// Empty tokens are skipped.
    pub fn parse_lenient(text: &str) -> (Self, Vec<String>) {
        let mut counts = Vec::new();
        let mut rejected = Vec::new();
        for token in text.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<u32>() {
                Ok(n) => counts.push(n),
                Err(_) => rejected.push(token.to_string()),
            }
        }
        (Self(counts), rejected)
    }
}

impl std::fmt::Display for EmissionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

impl Serialize for EmissionPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EmissionPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let (pattern, rejected) = Self::parse_lenient(&text);
        if let Some(bad) = rejected.first() {
            return Err(serde::de::Error::custom(format!(
                "invalid emission count '{}'",
                bad
            )));
        }
        Ok(pattern)
    }
}

/// What an emitter does once its pattern is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Start over from the first frame.
    #[default]
    Repeat,
    /// Stop emitting.
    Complete,
}

impl PatternType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "repeat" => Some(PatternType::Repeat),
            "complete" => Some(PatternType::Complete),
            _ => None,
        }
    }
}
