//! Helpers over loosely typed JSON field values.
//!
//! The store enforces no schema: numbers may arrive as strings, empty
//! strings stand for "not set", and floats may be integral.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Round to two decimals (cents).
pub fn round2(x: f64) -> f64 {
    let r = (x * 100.0).round() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

/// Numeric reading of a value: numbers, numeric strings. Empty → `None`.
pub fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim().replace(',', "");
            if t.is_empty() { None } else { t.parse().ok() }
        }
        _ => None,
    }
}

/// Non-empty textual reading of a value.
pub fn as_text(v: &Value) -> Option<&str> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Truthiness used for flags such as `factura` and `pago`.
pub fn as_flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "si" | "sí" | "yes" | "1" | "x"
        ),
        _ => false,
    }
}

/// JSON number for `x`, integral values without a fractional part.
pub fn number(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < 9.0e15 {
        Value::from(x as i64)
    } else {
        Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// `Some(x)` → number, `None` → null.
pub fn opt_number(x: Option<f64>) -> Value {
    x.map(number).unwrap_or(Value::Null)
}

/// Recursively rewrite integral floats as integers so that `50.0` and `50`
/// compare equal once stored.
pub fn normalize(v: Value) -> Value {
    match v {
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => number(f),
            _ => Value::Number(n),
        },
        Value::Array(a) => Value::Array(a.into_iter().map(normalize).collect()),
        Value::Object(o) => Value::Object(o.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

/// Human rendering of a field value for audit lines.
///
/// Strings verbatim, integral numbers without `.0`, null or missing as an
/// empty string, composite values as compact JSON.
pub fn display_value(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => normalize(other.clone()).to_string(),
    }
}

/// Serde adapters for lenient model fields.
pub mod lenient {
    use super::*;

    pub fn opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(as_f64))
    }

    pub fn f64_or_zero<'de, D>(d: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64(d)?.unwrap_or(0.0))
    }

    pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn flag<'de, D>(d: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().map(as_flag).unwrap_or(false))
    }

    pub fn opt_i64<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64(d)?.map(|x| x as i64))
    }
}

/// Read user input for a numeric field. Empty input clears the field.
pub fn parse_number_input(field: &str, raw: &str) -> crate::errors::AppResult<Value> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(Value::Null);
    }
    as_f64(&Value::String(t.to_string()))
        .map(number)
        .ok_or_else(|| crate::errors::AppError::InvalidField(field.to_string(), raw.to_string()))
}

/// Read user input for a yes/no field.
pub fn parse_flag_input(field: &str, raw: &str) -> crate::errors::AppResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "si" | "sí" | "yes" | "1" | "x" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        _ => Err(crate::errors::AppError::InvalidField(
            field.to_string(),
            raw.to_string(),
        )),
    }
}
