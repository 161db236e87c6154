use super::payment::PaymentMethod;
use super::value::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One scheduled service (row of a day sheet).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceJob {
    /// Assigned worker id; empty means unassigned.
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub realizadopor: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub anombrede: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub servicio: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub cubicos: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub pago: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub formadepago: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub metododepago: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub banco: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub efectivo: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub factura: bool,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,

    /// Fields this model does not know about, kept as they are.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceJob {
    pub fn is_assigned(&self) -> bool {
        self.realizadopor.is_some()
    }

    /// `formadepago` wins over the older `metododepago`.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.formadepago
            .as_deref()
            .and_then(PaymentMethod::parse)
            .or_else(|| self.metododepago.as_deref().and_then(PaymentMethod::parse))
    }

    pub fn is_cash(&self) -> bool {
        self.payment_method().is_some_and(|m| m.is_cash())
    }
}

/// Editable job fields and the record key behind each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum JobField {
    Realizadopor,
    Direccion,
    Anombrede,
    Servicio,
    Cubicos,
    Valor,
    Pago,
    Formadepago,
    Metododepago,
    Banco,
    Notas,
    Efectivo,
    Factura,
    Fecha,
}

impl JobField {
    pub fn key(&self) -> &'static str {
        match self {
            JobField::Realizadopor => "realizadopor",
            JobField::Direccion => "direccion",
            JobField::Anombrede => "anombrede",
            JobField::Servicio => "servicio",
            JobField::Cubicos => "cubicos",
            JobField::Valor => "valor",
            JobField::Pago => "pago",
            JobField::Formadepago => "formadepago",
            JobField::Metododepago => "metododepago",
            JobField::Banco => "banco",
            JobField::Notas => "notas",
            JobField::Efectivo => "efectivo",
            JobField::Factura => "factura",
            JobField::Fecha => "fecha",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, JobField::Cubicos | JobField::Valor | JobField::Efectivo)
    }
}
