use super::value::{lenient, round2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One payroll processing period (`nominas`), id `<fechaDesde>_<fechaHasta>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    #[serde(rename = "fechaDesde")]
    pub fecha_desde: String,
    #[serde(rename = "fechaHasta")]
    pub fecha_hasta: String,
    #[serde(rename = "fechaCreacion", default)]
    pub fecha_creacion: String,
    #[serde(default)]
    pub registros: BTreeMap<String, PayrollRow>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PayrollRun {
    pub fn run_id(desde: &str, hasta: &str) -> String {
        format!("{}_{}", desde, hasta)
    }
}

/// Per-employee payroll line. Everything except `nombre`, `dias`, `valor`
/// and `entregado` is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollRow {
    /// Employee id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub dias: f64,
    /// Daily rate.
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub valor: f64,
    #[serde(rename = "totalQuincena", default, deserialize_with = "lenient::f64_or_zero")]
    pub total_quincena: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub extra: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub deducciones: f64,
    #[serde(rename = "totalNomina", default, deserialize_with = "lenient::f64_or_zero")]
    pub total_nomina: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub efectivo: f64,
    /// Saldo inicial.
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub entregado: f64,
}

impl PayrollRow {
    /// Re-derive the arithmetic chain from the current inputs:
    /// `totalQuincena = dias * valor`,
    /// `totalNomina = totalQuincena + extra - deducciones`,
    /// `total = totalNomina + efectivo`.
    pub fn recompute(&mut self) {
        self.total_quincena = round2(self.dias * self.valor);
        self.total_nomina = round2(self.total_quincena + self.extra - self.deducciones);
        self.total = round2(self.total_nomina + self.efectivo);
    }

    /// Final balance shown after what was handed over.
    pub fn balance(&self) -> f64 {
        round2(self.total - self.entregado)
    }
}

/// Row fields a user may set directly.
///
/// `Extra`, `Deducciones` and `Efectivo` are normally aggregated from other
/// collections. Setting one by hand is a manual override: the next refresh
/// or reassignment of the row replaces it with the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PayrollField {
    Dias,
    Valor,
    Extra,
    Deducciones,
    Efectivo,
    Entregado,
}

impl PayrollField {
    pub fn key(&self) -> &'static str {
        match self {
            PayrollField::Dias => "dias",
            PayrollField::Valor => "valor",
            PayrollField::Extra => "extra",
            PayrollField::Deducciones => "deducciones",
            PayrollField::Efectivo => "efectivo",
            PayrollField::Entregado => "entregado",
        }
    }

    /// Aggregated from other collections unless overridden.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            PayrollField::Extra | PayrollField::Deducciones | PayrollField::Efectivo
        )
    }

    pub fn apply(&self, row: &mut PayrollRow, value: f64) {
        match self {
            PayrollField::Dias => row.dias = value,
            PayrollField::Valor => row.valor = value,
            PayrollField::Extra => row.extra = value,
            PayrollField::Deducciones => row.deducciones = value,
            PayrollField::Efectivo => row.efectivo = value,
            PayrollField::Entregado => row.entregado = value,
        }
        row.recompute();
    }
}
