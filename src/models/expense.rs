use super::value::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Business expense (`gastos`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub proveedor: Option<String>,
    #[serde(rename = "metodoPago", default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub metodo_pago: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub banco: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub monto: f64,
    #[serde(rename = "numFactura", default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub num_factura: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub responsable: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExpenseField {
    Fecha,
    Categoria,
    Descripcion,
    Proveedor,
    MetodoPago,
    Banco,
    Monto,
    NumFactura,
    Responsable,
}

impl ExpenseField {
    pub fn key(&self) -> &'static str {
        match self {
            ExpenseField::Fecha => "fecha",
            ExpenseField::Categoria => "categoria",
            ExpenseField::Descripcion => "descripcion",
            ExpenseField::Proveedor => "proveedor",
            ExpenseField::MetodoPago => "metodoPago",
            ExpenseField::Banco => "banco",
            ExpenseField::Monto => "monto",
            ExpenseField::NumFactura => "numFactura",
            ExpenseField::Responsable => "responsable",
        }
    }
}
