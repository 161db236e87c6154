use super::payment::PaymentMethod;
use super::value::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cash report line (`informedeefectivo`). Positive `efectivo` is cash the
/// worker collected, negative is cash handed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashEntry {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub realizadopor: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub metododepago: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub efectivo: f64,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub origen: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CashEntry {
    pub fn is_cash(&self) -> bool {
        self.metododepago
            .as_deref()
            .and_then(PaymentMethod::parse)
            .is_some_and(|m| m.is_cash())
    }
}
