use std::fmt;

/// Payment method as written on jobs, expenses and cash entries.
///
/// Stored values are free text; this is the closed reading of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentMethod {
    Efectivo,
    Transferencia,
    Cheque,
    Tarjeta,
    Credito,
    Otro(String),
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() {
            return None;
        }

        Some(match t.to_lowercase().as_str() {
            "efectivo" | "cash" | "cash payment" => PaymentMethod::Efectivo,
            "transferencia" | "transfer" | "zelle" | "ach" => PaymentMethod::Transferencia,
            "cheque" | "check" => PaymentMethod::Cheque,
            "tarjeta" | "card" | "credit card" | "debit" => PaymentMethod::Tarjeta,
            "credito" | "crédito" | "credit" => PaymentMethod::Credito,
            _ => PaymentMethod::Otro(t.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Efectivo => "efectivo",
            PaymentMethod::Transferencia => "transferencia",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Tarjeta => "tarjeta",
            PaymentMethod::Credito => "credito",
            PaymentMethod::Otro(s) => s,
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Efectivo)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
