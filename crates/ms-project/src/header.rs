//! `config.h` generation from the flow editor's `simulation-config` node.

use std::path::Path;

use serde_json::Value;

use crate::node_red::{NodeRedExport, NodeRedKind, NodeRedRecord};
use crate::values::{as_f64, exp_notation, float_repr, raw_token, truthy};
use crate::{ProjectError, ProjectResult};

/// Compile-time simulator settings. Integer-like fields are kept as the text
/// the editor stored so they are emitted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub output_results: bool,
    pub graphics_on: bool,
    pub mode: String,
    pub time_to_run: String,
    pub dt: String,
    pub iterations_per_frame: String,
    pub diffusion_coefficient: f64,
    pub graphics_zoom_multiplier: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            output_results: false,
            graphics_on: true,
            mode: "1".into(),
            time_to_run: "500".into(),
            dt: "0.01".into(),
            iterations_per_frame: "10".into(),
            diffusion_coefficient: 7.94e-11,
            graphics_zoom_multiplier: 1000.0,
        }
    }
}

impl SimulationSettings {
    pub fn from_record(record: &NodeRedRecord) -> ProjectResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            output_results: present(&record.output_results)
                .map(truthy)
                .unwrap_or(defaults.output_results),
            graphics_on: present(&record.graphics_on)
                .map(truthy)
                .unwrap_or(defaults.graphics_on),
            mode: present(&record.mode).map(raw_token).unwrap_or(defaults.mode),
            time_to_run: present(&record.time_to_run)
                .map(raw_token)
                .unwrap_or(defaults.time_to_run),
            dt: match present(&record.dt) {
                // numeric text is normalised to float form, numbers pass through
                Some(Value::String(s)) => float_repr(parse_number("dt", s)?),
                Some(v) => raw_token(v),
                None => defaults.dt,
            },
            iterations_per_frame: present(&record.iterations_per_frame)
                .map(raw_token)
                .unwrap_or(defaults.iterations_per_frame),
            diffusion_coefficient: number_or(
                "diffusionCoefficient",
                &record.diffusion_coefficient,
                defaults.diffusion_coefficient,
            )?,
            graphics_zoom_multiplier: number_or(
                "graphicsZoomMultiplier",
                &record.graphics_zoom_multiplier,
                defaults.graphics_zoom_multiplier,
            )?,
        })
    }
}

fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

fn parse_number(field: &str, text: &str) -> ProjectResult<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ProjectError::InvalidValue {
            field: field.to_string(),
            value: text.to_string(),
        })
}

fn number_or(field: &str, value: &Option<Value>, default: f64) -> ProjectResult<f64> {
    match present(value) {
        None => Ok(default),
        Some(v) => as_f64(v).ok_or_else(|| ProjectError::InvalidValue {
            field: field.to_string(),
            value: raw_token(v),
        }),
    }
}

/// Everything `config.h` is generated from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderConfig {
    /// From the first `simulation-config` node; `None` leaves only the guard.
    pub settings: Option<SimulationSettings>,
    /// `flowValue` of the first flow node, verbatim.
    pub flow_value: Option<String>,
}

impl HeaderConfig {
    pub fn from_export(export: &NodeRedExport) -> ProjectResult<Self> {
        let settings = export
            .of_kind(NodeRedKind::SimulationConfig)
            .next()
            .map(SimulationSettings::from_record)
            .transpose()?;
        let flow_value = export.of_kind(NodeRedKind::Flow).next().map(|flow| {
            present(&flow.flow_value)
                .map(raw_token)
                .unwrap_or_else(|| "0".to_string())
        });
        Ok(Self {
            settings,
            flow_value,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::from("//\n//  config.h\n\n#ifndef config_h\n#define config_h\n\n");

        if let Some(s) = &self.settings {
            out.push_str(&format!(
                "#define OUTPUT_RESULTS {}\n\
                 #define GRAPHICS_ON {}\n\
                 \n\
                 // 0 for single simulation\n\
                 // 1 for simulation network\n\
                 // If simulation network is chosen, applied boundary is automatically cylinder boundary\n\
                 #define MODE {}\n\
                 \n\
                 #define TIME_TO_RUN {}\n\
                 #define DT {}\n\
                 #define NUMBER_OF_ITERATIONS (int)(TIME_TO_RUN/DT)\n\
                 #define ITERATIONS_PER_FRAME {}\n\
                 \n\
                 #define D {} // diffusion coefficient\n\
                 \n\
                 #define GRAPHICS_ZOOM_MULTIPLIER {}\n",
                s.output_results,
                s.graphics_on,
                s.mode,
                s.time_to_run,
                s.dt,
                s.iterations_per_frame,
                exp_notation(s.diffusion_coefficient, 2),
                exp_notation(s.graphics_zoom_multiplier, 0),
            ));
        }

        if let Some(flow) = &self.flow_value {
            out.push_str(&format!("\n#define FLOW_VALUE {}\n", flow));
        }

        out.push_str("\n#endif /* config_h */\n");
        out
    }

    pub fn save(&self, path: &Path) -> ProjectResult<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
