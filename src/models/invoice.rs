use super::value::{lenient, round2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Issued invoice (`facturasemitidas`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub numerodefactura: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub anombrede: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    /// Free-form bill-to text, overrides name and address when present.
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub personalizado: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub qty: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub pago: bool,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub fechapago: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub fechaemision: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Invoice {
    /// Who the invoice is addressed to.
    pub fn bill_to(&self) -> &str {
        self.personalizado
            .as_deref()
            .or(self.anombrede.as_deref())
            .or(self.direccion.as_deref())
            .unwrap_or("")
    }

    /// Balance shown to the user: a paid invoice owes nothing, whatever
    /// its stored amount.
    pub fn balance_due(&self) -> f64 {
        if self.pago { 0.0 } else { self.amount }
    }

    /// `amount` as it should be for the current qty and rate.
    pub fn expected_amount(&self) -> f64 {
        round2(self.qty * self.rate)
    }
}

/// Company letterhead printed on invoices (`configuraciondefactura/empresa`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Letterhead {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub nota: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Letterhead {
    /// Non-empty lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        [
            &self.nombre,
            &self.direccion,
            &self.telefono,
            &self.correo,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InvoiceField {
    Anombrede,
    Direccion,
    Personalizado,
    Item,
    Qty,
    Rate,
    Pago,
}

impl InvoiceField {
    pub fn key(&self) -> &'static str {
        match self {
            InvoiceField::Anombrede => "anombrede",
            InvoiceField::Direccion => "direccion",
            InvoiceField::Personalizado => "personalizado",
            InvoiceField::Item => "item",
            InvoiceField::Qty => "qty",
            InvoiceField::Rate => "rate",
            InvoiceField::Pago => "pago",
        }
    }
}
