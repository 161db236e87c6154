//! Generic record: an opaque id plus an ordered bag of JSON fields.

use crate::errors::{AppError, AppResult};
use crate::models::value;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub fields: Fields,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Read the record through a typed model.
    pub fn to_model<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::CorruptRecord(self.id.clone(), e.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Non-empty string value of a field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(value::as_text)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value::as_f64)
    }

    /// Merge `partial` into this record. Returns `true` when anything changed.
    pub fn merge(&mut self, partial: &Fields) -> bool {
        let mut changed = false;
        for (k, v) in partial {
            if self.fields.get(k) != Some(v) {
                self.fields.insert(k.clone(), v.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Serialize a typed model into a field map with normalized numbers.
pub fn to_fields<T: Serialize>(model: &T) -> AppResult<Fields> {
    match value::normalize(serde_json::to_value(model)?) {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Other(format!(
            "expected an object, got {}",
            other
        ))),
    }
}
