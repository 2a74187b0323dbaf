//! Flow-editor (Node-RED) export import.
//!
//! The export is a flat JSON array of records. Only `pipe`, `flow`, `sink`
//! and `simulation-config` records matter; editor bookkeeping records (tabs,
//! debug nodes, ...) are ignored.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ms_flow::Seed;
use ms_graph::FlowGraphBuilder;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ProjectResult;
use crate::network::{ImportDefaults, ImportedNetwork};
use crate::schema::{
    EmissionPattern, EmitterSpec, NetworkConfig, PatternType, PipeDef, ReceiverSpec, SinkDef,
};
use crate::values::{as_f64, raw_token};
use crate::warnings::WarningSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRedKind {
    Pipe,
    Flow,
    Sink,
    SimulationConfig,
    Other,
}

impl NodeRedKind {
    pub fn from_type(t: &str) -> Self {
        match t {
            "pipe" => NodeRedKind::Pipe,
            "flow" => NodeRedKind::Flow,
            "sink" => NodeRedKind::Sink,
            "simulation-config" => NodeRedKind::SimulationConfig,
            _ => NodeRedKind::Other,
        }
    }
}

/// One exported editor record. Every field besides `id` is optional because
/// the record shape depends on its type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRedRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub wires: Vec<Vec<String>>,

    // pipe
    pub radius: Option<Value>,
    pub length: Option<Value>,
    pub receivers: Option<Vec<Value>>,
    pub emitters: Option<Vec<Value>>,

    // flow
    pub flow_value: Option<Value>,

    // simulation-config
    pub output_results: Option<Value>,
    pub graphics_on: Option<Value>,
    pub mode: Option<Value>,
    pub time_to_run: Option<Value>,
    pub dt: Option<Value>,
    pub iterations_per_frame: Option<Value>,
    pub diffusion_coefficient: Option<Value>,
    pub graphics_zoom_multiplier: Option<Value>,
}

impl NodeRedRecord {
    pub fn kind(&self) -> NodeRedKind {
        NodeRedKind::from_type(&self.type_name)
    }

    /// Targets wired to the first output port.
    pub fn outputs(&self) -> &[String] {
        self.wires.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Trimmed user label, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeRedExport {
    pub records: Vec<NodeRedRecord>,
}

impl NodeRedExport {
    pub fn from_json_str(json: &str) -> ProjectResult<Self> {
        let records: Vec<NodeRedRecord> = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    pub fn load(path: &Path) -> ProjectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn of_kind(&self, kind: NodeRedKind) -> impl Iterator<Item = &NodeRedRecord> + '_ {
        self.records.iter().filter(move |r| r.kind() == kind)
    }

    /// Build the propagation graph, seeds and network config.
    ///
    /// Pipes are named `pipe<k>` / `pipe<k>-<label>` and sinks `sink<k>` /
    /// `sink<k>-<label>`, numbered from 1 in export order.
    pub fn to_network(&self, defaults: &ImportDefaults) -> ProjectResult<ImportedNetwork> {
        let mut warnings = WarningSink::default();

        let pipes: Vec<&NodeRedRecord> = self.of_kind(NodeRedKind::Pipe).collect();
        let sinks: Vec<&NodeRedRecord> = self.of_kind(NodeRedKind::Sink).collect();

        let pipe_names: Vec<String> = pipes
            .iter()
            .enumerate()
            .map(|(i, p)| numbered("pipe", i, p.label()))
            .collect();
        let sink_names: Vec<String> = sinks
            .iter()
            .enumerate()
            .map(|(i, s)| numbered("sink", i, s.label()))
            .collect();

        // editor id -> generated name, for wiring
        let mut names: HashMap<&str, &str> = HashMap::new();
        for (record, name) in pipes.iter().zip(&pipe_names).chain(sinks.iter().zip(&sink_names)) {
            if names.insert(record.id.as_str(), name.as_str()).is_some() {
                warnings.push(name.as_str(), format!("duplicate editor id '{}'", record.id));
            }
        }
        let pipe_ids: HashSet<&str> = pipes.iter().map(|p| p.id.as_str()).collect();

        let mut left: HashMap<&str, Vec<String>> = HashMap::new();
        for (pipe, name) in pipes.iter().zip(&pipe_names) {
            for target in pipe.outputs() {
                if names.contains_key(target.as_str()) {
                    left.entry(target.as_str()).or_default().push(name.clone());
                }
            }
        }

        let mut builder = FlowGraphBuilder::new();
        let mut config = NetworkConfig::default();

        for (pipe, name) in pipes.iter().zip(&pipe_names) {
            let (radius, yaml_radius) =
                read_dimension(pipe.radius.as_ref(), defaults.pipe_radius, "radius", name, &mut warnings);
            let (_, length) =
                read_dimension(pipe.length.as_ref(), defaults.pipe_length, "length", name, &mut warnings);

            let segment = builder.add_segment(name.as_str(), radius);
            let right: Vec<String> = pipe
                .outputs()
                .iter()
                .filter_map(|t| names.get(t.as_str()).map(|n| n.to_string()))
                .collect();
            for target in &right {
                builder.connect(segment, target.as_str());
            }

            let mut def = PipeDef::new(length, yaml_radius);
            def.particle_count = defaults.particle_count;
            def.left_connections = left.get(pipe.id.as_str()).cloned().unwrap_or_default();
            def.right_connections = right;
            def.receivers = parse_receivers(name, pipe.receivers.as_deref().unwrap_or(&[]), &mut warnings);
            def.emitters = parse_emitters(name, pipe.emitters.as_deref().unwrap_or(&[]), &mut warnings);
            config.pipes.insert(name.clone(), def);
        }

        for (sink, name) in sinks.iter().zip(&sink_names) {
            config.sinks.insert(
                name.clone(),
                SinkDef {
                    left_connections: left.get(sink.id.as_str()).cloned().unwrap_or_default(),
                },
            );
        }

        let mut seeds = Vec::new();
        for flow in self.of_kind(NodeRedKind::Flow) {
            let value = match &flow.flow_value {
                None => 0.0,
                Some(raw) => match as_f64(raw) {
                    Some(v) => v,
                    None => {
                        warnings.push(
                            flow.id.as_str(),
                            format!("flowValue '{}' is not numeric, flow node ignored", raw_token(raw)),
                        );
                        continue;
                    }
                },
            };
            for target in flow.outputs() {
                match names.get(target.as_str()) {
                    Some(name) if pipe_ids.contains(target.as_str()) => {
                        seeds.push(Seed::new(*name, value));
                    }
                    Some(name) => warnings.push(
                        flow.id.as_str(),
                        format!("flow node wired straight to sink '{}', nothing to distribute", name),
                    ),
                    None => {}
                }
            }
        }

        Ok(ImportedNetwork {
            graph: builder.build()?,
            seeds,
            config,
            warnings: warnings.into_vec(),
        })
    }
}

fn numbered(prefix: &str, index: usize, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{}{}-{}", prefix, index + 1, label),
        None => format!("{}{}", prefix, index + 1),
    }
}

/// Returns the value for the propagation graph (`None` when unusable) and
/// the value to write into the config (default when unusable).
fn read_dimension(
    raw: Option<&Value>,
    default: f64,
    field: &str,
    subject: &str,
    warnings: &mut WarningSink,
) -> (Option<f64>, f64) {
    let Some(raw) = raw else {
        return (Some(default), default);
    };
    match as_f64(raw) {
        Some(v) if v.is_finite() && v >= 0.0 => (Some(v), v),
        _ => {
            warnings.push(
                subject,
                format!("{} '{}' is not a usable number, writing {}", field, raw_token(raw), default),
            );
            (None, default)
        }
    }
}

fn coordinate(obj: &Map<String, Value>, key: &str, subject: &str, warnings: &mut WarningSink) -> f64 {
    match obj.get(key) {
        None | Some(Value::Null) => 0.0,
        Some(raw) => as_f64(raw).unwrap_or_else(|| {
            warnings.push(subject, format!("{} '{}' is not numeric, using 0", key, raw_token(raw)));
            0.0
        }),
    }
}

fn parse_receivers(pipe: &str, raw: &[Value], warnings: &mut WarningSink) -> Vec<ReceiverSpec> {
    let mut receivers = Vec::new();
    for item in raw {
        let Some(obj) = item.as_object() else {
            warnings.push(pipe, "receiver entry is not an object, skipping");
            continue;
        };
        let Some(type_label) = obj.get("type").and_then(Value::as_str) else {
            warnings.push(pipe, "receiver is missing its 'type' field, skipping");
            continue;
        };

        let z = coordinate(obj, "z", pipe, warnings);
        let r = coordinate(obj, "r", pipe, warnings);
        let theta = coordinate(obj, "theta", pipe, warnings);

        let mut spec = match type_label.trim() {
            ReceiverSpec::SPHERE_LABEL => {
                let radius = obj.get("radius").and_then(as_f64).unwrap_or_else(|| {
                    warnings.push(pipe, "sphere receiver has no radius, using 1e-6");
                    1e-6
                });
                ReceiverSpec::Sphere {
                    radius,
                    z,
                    r,
                    theta,
                    name: None,
                }
            }
            ReceiverSpec::RING_LABEL => ReceiverSpec::Ring {
                z,
                r,
                theta,
                name: None,
            },
            other => {
                warnings.push(pipe, format!("unknown receiver type '{}', skipping", other));
                continue;
            }
        };
        spec.set_name(format!("#{}-{}", receivers.len() + 1, spec.type_label()));
        receivers.push(spec);
    }
    receivers
}

fn parse_emitters(pipe: &str, raw: &[Value], warnings: &mut WarningSink) -> Vec<EmitterSpec> {
    let mut emitters = Vec::new();
    for item in raw {
        let Some(obj) = item.as_object() else {
            warnings.push(pipe, "emitter entry is not an object, skipping");
            continue;
        };

        let text = match obj.get("emitter_pattern") {
            Some(Value::Array(items)) => items.iter().map(raw_token).collect::<Vec<_>>().join(","),
            Some(other) => raw_token(other),
            None => String::new(),
        };
        let (pattern, rejected) = EmissionPattern::parse_lenient(&text);
        for token in rejected {
            warnings.push(pipe, format!("invalid emitter pattern value '{}', skipping it", token));
        }
        if pattern.is_empty() {
            warnings.push(pipe, "emitter has no valid emission pattern, skipping");
            continue;
        }

        let pattern_type = match obj.get("emitter_pattern_type").and_then(Value::as_str) {
            None => PatternType::Repeat,
            Some(s) => PatternType::parse(s).unwrap_or_else(|| {
                warnings.push(pipe, format!("invalid emitter pattern type '{}', using repeat", s));
                PatternType::Repeat
            }),
        };

        emitters.push(EmitterSpec {
            z: coordinate(obj, "z", pipe, warnings),
            r: coordinate(obj, "r", pipe, warnings),
            theta: coordinate(obj, "theta", pipe, warnings),
            emitter_pattern: pattern,
            emitter_pattern_type: pattern_type,
        });
    }
    emitters
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_kinds_and_outputs() {
        let export = NodeRedExport::from_json_str(
            r#"[
                {"id": "t1", "type": "tab", "label": "Flow 1"},
                {"id": "p1", "type": "pipe", "name": "  inlet ", "wires": [["p2"], ["x"]]},
                {"id": "p2", "type": "pipe", "wires": []}
            ]"#,
        )
        .unwrap();

        assert_eq!(export.records[0].kind(), NodeRedKind::Other);
        assert_eq!(export.records[1].label(), Some("inlet"));
        assert_eq!(export.records[1].outputs(), &["p2".to_string()]);
        assert!(export.records[2].outputs().is_empty());
        assert_eq!(export.of_kind(NodeRedKind::Pipe).count(), 2);
    }

    #[test]
    fn naming_uses_one_based_index_and_label() {
        assert_eq!(numbered("pipe", 0, None), "pipe1");
        assert_eq!(numbered("sink", 2, Some("out")), "sink3-out");
    }

    #[test]
    fn receivers_are_typed_and_numbered() {
        let mut warnings = WarningSink::default();
        let raw = vec![
            json!({"type": "Sphere type", "radius": "2e-6", "z": "0.05"}),
            json!({"type": "Cube type"}),
            json!({"radius": 1}),
            json!({"type": "Ring type", "r": 1e-4, "theta": "1.57"}),
            json!({"type": "Sphere type"}),
        ];
        let receivers = parse_receivers("pipe1", &raw, &mut warnings);

        assert_eq!(receivers.len(), 3);
        assert_eq!(
            receivers[0],
            ReceiverSpec::Sphere {
                radius: 2e-6,
                z: 0.05,
                r: 0.0,
                theta: 0.0,
                name: Some("#1-Sphere type".into()),
            }
        );
        assert_eq!(receivers[1].name(), Some("#2-Ring type"));
        assert!(matches!(receivers[2], ReceiverSpec::Sphere { radius, .. } if radius == 1e-6));
        assert_eq!(warnings.into_vec().len(), 3);
    }

    #[test]
    fn emitters_parse_patterns() {
        let mut warnings = WarningSink::default();
        let raw = vec![
            json!({"z": "0.01", "emitter_pattern": "10,0,x,5", "emitter_pattern_type": "complete"}),
            json!({"emitter_pattern": ""}),
            json!({"emitter_pattern": [1, 2], "emitter_pattern_type": "loop"}),
        ];
        let emitters = parse_emitters("pipe2", &raw, &mut warnings);

        assert_eq!(emitters.len(), 2);
        assert_eq!(emitters[0].emitter_pattern.0, vec![10, 0, 5]);
        assert_eq!(emitters[0].emitter_pattern_type, PatternType::Complete);
        assert_eq!(emitters[0].z, 0.01);
        assert_eq!(emitters[1].emitter_pattern.0, vec![1, 2]);
        assert_eq!(emitters[1].emitter_pattern_type, PatternType::Repeat);
        // bad token, empty pattern, bad pattern type
        assert_eq!(warnings.into_vec().len(), 3);
    }

    #[test]
    fn dimensions_fall_back_to_defaults() {
        let mut warnings = WarningSink::default();
        assert_eq!(read_dimension(None, 0.01, "radius", "p", &mut warnings), (Some(0.01), 0.01));
        assert_eq!(
            read_dimension(Some(&json!("0.02")), 0.01, "radius", "p", &mut warnings),
            (Some(0.02), 0.02)
        );
        assert_eq!(
            read_dimension(Some(&json!("thin")), 0.01, "radius", "p", &mut warnings),
            (None, 0.01)
        );
        assert_eq!(
            read_dimension(Some(&json!(-3.0)), 0.01, "radius", "p", &mut warnings),
            (None, 0.01)
        );
        assert_eq!(warnings.into_vec().len(), 2);
    }
}
