//! Loose value coercion for editor exports and C-style number formatting.
//!
//! The flow editor stores most numeric fields as strings, so numeric reads
//! accept either JSON numbers or numeric text.

use serde_json::Value;

/// Read a number from a JSON number or numeric string.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Truthiness of an editor flag. Strings `"true"`/`"false"` are honoured
/// literally; any other non-empty string counts as set.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" => false,
            _ => true,
        },
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render a value verbatim as a header token: strings unquoted, integers as
/// integers, floats in shortest round-trip form.
pub fn raw_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => n.as_f64().map(float_repr).unwrap_or_else(|| n.to_string()),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Shortest round-trip float text, always with a decimal point or exponent.
/// Magnitudes below 1e-4 or from 1e16 up use exponent form (`1e-05`).
pub fn float_repr(v: f64) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "nan".to_string()
        } else if v > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    let mag = v.abs();
    if v == 0.0 || (1e-4..1e16).contains(&mag) {
        let s = format!("{}", v);
        if s.contains('.') { s } else { format!("{}.0", s) }
    } else {
        normalize_exponent(&format!("{:e}", v))
    }
}

/// `printf("%.Ne")` style: fixed mantissa digits, signed two-digit exponent.
pub fn exp_notation(v: f64, precision: usize) -> String {
    normalize_exponent(&format!("{:.*e}", precision, v))
}

/// Turn Rust's `1.5e-5` / `9e2` into `1.5e-05` / `9e+02`.
fn normalize_exponent(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp.trim_start_matches('+')),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s.to_string(),
    }
}
