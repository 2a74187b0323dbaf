//! Network config validation.

use crate::schema::{NetworkConfig, PipeDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Name used by both a pipe and a sink: {name}")]
    AmbiguousName { name: String },
}

/// Check that connection lists only name known pipes or sinks and that
/// geometry and flow values are usable.
pub fn validate_network(config: &NetworkConfig) -> Result<(), ValidationError> {
    for name in config.sinks.keys() {
        if config.pipes.contains_key(name) {
            return Err(ValidationError::AmbiguousName { name: name.clone() });
        }
    }

    let known = |name: &String| config.pipes.contains_key(name) || config.sinks.contains_key(name);

    for (name, pipe) in &config.pipes {
        validate_pipe(name, pipe)?;

        for (side, list) in [
            ("left_connections", &pipe.left_connections),
            ("right_connections", &pipe.right_connections),
        ] {
            if let Some(missing) = list.iter().find(|c| !known(c)) {
                return Err(ValidationError::MissingReference {
                    id: missing.clone(),
                    context: format!("pipe '{}' {}", name, side),
                });
            }
        }
    }

    for (name, sink) in &config.sinks {
        if let Some(missing) = sink.left_connections.iter().find(|c| !config.pipes.contains_key(*c)) {
            return Err(ValidationError::MissingReference {
                id: missing.clone(),
                context: format!("sink '{}' left_connections", name),
            });
        }
    }

    Ok(())
}

fn validate_pipe(name: &str, pipe: &PipeDef) -> Result<(), ValidationError> {
    for (field, value) in [("length", pipe.length), ("radius", pipe.radius)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("pipe '{}' {}", name, field),
                value: value.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
    }

    if let Some(flow) = pipe.flow
        && !flow.is_finite()
    {
        return Err(ValidationError::InvalidValue {
            field: format!("pipe '{}' flow", name),
            value: flow.to_string(),
            reason: "must be finite".to_string(),
        });
    }

    Ok(())
}
