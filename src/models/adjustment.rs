use super::value::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payroll extra or deduction for one employee on one date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub fecha: Option<String>,
    /// Employee id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub realizado: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub valor: f64,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
