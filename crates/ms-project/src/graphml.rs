//! GraphML diagram import.
//!
//! Nodes become pipes named by their GraphML id; the first `NodeLabel` text
//! inside a node carries `length=..., radius=...`. Element matching is on
//! local names so any namespace prefix works.

use std::collections::HashMap;
use std::path::Path;

use ms_core::SegmentId;
use ms_graph::FlowGraphBuilder;
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use crate::network::ImportedNetwork;
use crate::schema::{NetworkConfig, PipeDef};
use crate::warnings::WarningSink;
use crate::{ProjectError, ProjectResult};

static LABEL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([^,;\s]+)").expect("label pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct GraphmlNode {
    pub id: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphmlEdge {
    pub source: String,
    pub target: String,
}

/// Nodes and edges in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphmlDocument {
    pub nodes: Vec<GraphmlNode>,
    pub edges: Vec<GraphmlEdge>,
}

impl GraphmlDocument {
    pub fn parse_str(xml: &str) -> ProjectResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text_start = true;
        reader.config_mut().trim_text_end = true;

        let mut doc = GraphmlDocument::default();
        // indices into doc.nodes for the currently open <node> elements
        let mut open: Vec<usize> = Vec::new();
        let mut in_label = false;

        loop {
            let event = reader.read_event().map_err(|e| ProjectError::Xml {
                position: reader.error_position(),
                message: e.to_string(),
            })?;
            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"node" => {
                        doc.nodes.push(GraphmlNode {
                            id: attribute(&e, b"id")?.unwrap_or_default(),
                            label: None,
                        });
                        open.push(doc.nodes.len() - 1);
                    }
                    b"edge" => doc.push_edge(&e)?,
                    b"NodeLabel" => in_label = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"node" => doc.nodes.push(GraphmlNode {
                        id: attribute(&e, b"id")?.unwrap_or_default(),
                        label: None,
                    }),
                    b"edge" => doc.push_edge(&e)?,
                    _ => {}
                },
                Event::Text(e) if in_label => {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    let text = match quick_xml::escape::unescape(raw.as_ref()) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => raw.into_owned(),
                    };
                    if let Some(&index) = open.last()
                        && doc.nodes[index].label.is_none()
                        && !text.is_empty()
                    {
                        doc.nodes[index].label = Some(text);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"node" => {
                        open.pop();
                    }
                    b"NodeLabel" => in_label = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(doc)
    }

    pub fn load(path: &Path) -> ProjectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    fn push_edge(&mut self, e: &BytesStart<'_>) -> ProjectResult<()> {
        let source = attribute(e, b"source")?.unwrap_or_default();
        let target = attribute(e, b"target")?.unwrap_or_default();
        self.edges.push(GraphmlEdge { source, target });
        Ok(())
    }

    /// Build pipes and the propagation graph. Seeds are left empty; a diagram
    /// carries no flow sources, the caller supplies them.
    pub fn to_network(&self) -> ProjectResult<ImportedNetwork> {
        let mut warnings = WarningSink::default();
        let mut builder = FlowGraphBuilder::new();
        let mut config = NetworkConfig::default();
        let mut ids: HashMap<&str, SegmentId> = HashMap::new();

        for node in &self.nodes {
            if node.id.is_empty() {
                warnings.push("graphml", "node without an id, skipping");
                continue;
            }
            if ids.contains_key(node.id.as_str()) {
                warnings.push(node.id.as_str(), "duplicate node id, keeping the first");
                continue;
            }

            let dims = LabelDimensions::parse(node.label.as_deref());
            for problem in &dims.problems {
                warnings.push(node.id.as_str(), problem.as_str());
            }

            let segment = builder.add_segment(node.id.as_str(), dims.radius);
            ids.insert(node.id.as_str(), segment);
            config.pipes.insert(
                node.id.clone(),
                PipeDef::new(dims.length.unwrap_or(0.0), dims.radius.unwrap_or(0.0)),
            );
        }

        for edge in &self.edges {
            let (Some(&from), true) = (
                ids.get(edge.source.as_str()),
                ids.contains_key(edge.target.as_str()),
            ) else {
                tracing::debug!(source = %edge.source, target = %edge.target, "edge endpoint is not a node, ignoring");
                continue;
            };
            builder.connect(from, edge.target.as_str());
            if let Some(pipe) = config.pipes.get_mut(&edge.source) {
                pipe.right_connections.push(edge.target.clone());
            }
            if let Some(pipe) = config.pipes.get_mut(&edge.target) {
                pipe.left_connections.push(edge.source.clone());
            }
        }

        Ok(ImportedNetwork {
            graph: builder.build()?,
            seeds: Vec::new(),
            config,
            warnings: warnings.into_vec(),
        })
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> ProjectResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ProjectError::Xml {
            position: 0,
            message: err.to_string(),
        })?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

/// `length` / `radius` read out of a node label.
#[derive(Debug, Default, PartialEq)]
struct LabelDimensions {
    length: Option<f64>,
    radius: Option<f64>,
    problems: Vec<String>,
}

impl LabelDimensions {
    fn parse(label: Option<&str>) -> Self {
        let mut dims = LabelDimensions::default();
        let Some(label) = label else {
            dims.problems.push("node has no label, length and radius set to 0".into());
            return dims;
        };

        for caps in LABEL_PAIR.captures_iter(label) {
            let slot = match &caps[1] {
                "length" => &mut dims.length,
                "radius" => &mut dims.radius,
                _ => continue,
            };
            match caps[2].parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => *slot = Some(v),
                _ => dims
                    .problems
                    .push(format!("{} '{}' is not a usable number", &caps[1], &caps[2])),
            }
        }
        if dims.length.is_none() {
            dims.problems.push("no length in label, using 0".into());
        }
        if dims.radius.is_none() {
            dims.problems.push("no radius in label, using 0 and leaving it out of flow splits".into());
        }
        dims
    }
}
