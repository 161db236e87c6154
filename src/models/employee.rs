use super::value::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_active() -> bool {
    true
}

/// Worker (record of `users`). Jobs and payroll rows point at its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
