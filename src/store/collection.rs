//! Names of the collections kept in the store.
//!
//! The names must match the existing schema byte for byte, including the
//! `ñ` of the planning sheets.

use crate::errors::{AppError, AppResult};
use std::fmt;

/// Atomic counter used for invoice numbering.
pub const INVOICE_COUNTER: &str = "contadorFactura";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Today,
    Tomorrow,
    DayAfter,
    ArchivedDays,
    Clients,
    Users,
    Invoices,
    InvoiceConfig,
    Expenses,
    Payroll,
    Extras,
    Deductions,
    CashReport,
    History,
}

impl Collection {
    pub const ALL: [Collection; 14] = [
        Collection::Today,
        Collection::Tomorrow,
        Collection::DayAfter,
        Collection::ArchivedDays,
        Collection::Clients,
        Collection::Users,
        Collection::Invoices,
        Collection::InvoiceConfig,
        Collection::Expenses,
        Collection::Payroll,
        Collection::Extras,
        Collection::Deductions,
        Collection::CashReport,
        Collection::History,
    ];

    /// Collections observed by the history tracker.
    pub const TRACKED: [Collection; 6] = [
        Collection::Today,
        Collection::Tomorrow,
        Collection::DayAfter,
        Collection::ArchivedDays,
        Collection::Invoices,
        Collection::CashReport,
    ];

    /// The three scheduling sheets, in day order.
    pub const SHEETS: [Collection; 3] = [
        Collection::Today,
        Collection::Tomorrow,
        Collection::DayAfter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Today => "data",
            Collection::Tomorrow => "hojamañana",
            Collection::DayAfter => "hojapasadomañana",
            Collection::ArchivedDays => "registrofechas",
            Collection::Clients => "clientes",
            Collection::Users => "users",
            Collection::Invoices => "facturasemitidas",
            Collection::InvoiceConfig => "configuraciondefactura",
            Collection::Expenses => "gastos",
            Collection::Payroll => "nominas",
            Collection::Extras => "extras",
            Collection::Deductions => "deducciones",
            Collection::CashReport => "informedeefectivo",
            Collection::History => "historialdecambios",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Collection::ALL.iter().copied().find(|c| c.name() == s)
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        Self::from_name(s).ok_or_else(|| AppError::UnknownCollection(s.to_string()))
    }

    pub fn is_tracked(&self) -> bool {
        Collection::TRACKED.contains(self)
    }

    pub fn is_sheet(&self) -> bool {
        Collection::SHEETS.contains(self)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
