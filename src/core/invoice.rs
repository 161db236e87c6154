//! Invoicing: sequential numbering, derived amount, fixed price list and
//! the company letterhead.

use crate::errors::{AppError, AppResult};
use crate::models::invoice::{Invoice, InvoiceField, Letterhead};
use crate::models::job::ServiceJob;
use crate::models::value::{
    display_value, number, parse_flag_input, parse_number_input, round2,
};
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, INVOICE_COUNTER, Record, fields};
use crate::ui::messages::{info, success};
use crate::utils::date;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde_json::Value;

/// Record id of the letterhead in `configuraciondefactura`.
pub const LETTERHEAD_ID: &str = "empresa";

/// Service items and their rate.
pub const PRICE_LIST: [(&str, f64); 6] = [
    ("Servicio de Poso", 80.0),
    ("Tuberia", 100.0),
    ("Hidrojet", 250.0),
    ("Trampa de Grasa", 150.0),
    ("Agua", 60.0),
    ("Visita Tecnica", 40.0),
];

/// Rate of a price-list item, matched case-insensitively.
pub fn item_rate(item: &str) -> Option<f64> {
    let wanted = item.trim().to_lowercase();
    PRICE_LIST
        .iter()
        .find(|(name, _)| name.to_lowercase() == wanted)
        .map(|(_, rate)| *rate)
}

/// `YY` + `MM` + 4-digit zero-padded sequence.
pub fn format_invoice_number(seq: i64, on: NaiveDate) -> String {
    format!("{:02}{:02}{:04}", on.year() % 100, on.month(), seq)
}

#[derive(Debug, Clone, Default)]
pub struct NewInvoice {
    pub anombrede: Option<String>,
    pub direccion: Option<String>,
    pub personalizado: Option<String>,
    pub item: Option<String>,
    pub qty: f64,
    /// Explicit rate; without one the price list rate of `item` applies.
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PaidFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceTotals {
    pub count: usize,
    pub amount: f64,
    pub balance_due: f64,
}

pub struct InvoiceLogic;

impl InvoiceLogic {
    /// Take the next number from the shared counter. Two callers never get
    /// the same one.
    pub fn next_number(store: &CollectionStore, now: NaiveDate) -> AppResult<String> {
        let seq = store.atomic_increment(INVOICE_COUNTER)?;
        Ok(format_invoice_number(seq, now))
    }

    pub fn create(
        store: &CollectionStore,
        input: &NewInvoice,
        now: DateTime<Local>,
    ) -> AppResult<Record> {
        // An explicit rate wins over the price list, so a job's agreed price
        // carries over. Changing the item later applies the list rate.
        let rate = input
            .rate
            .or_else(|| input.item.as_deref().and_then(item_rate))
            .unwrap_or(0.0);

        let clean = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        };

        let mut invoice = Invoice {
            numerodefactura: Some(Self::next_number(store, now.date_naive())?),
            anombrede: clean(&input.anombrede),
            direccion: clean(&input.direccion),
            personalizado: clean(&input.personalizado),
            item: clean(&input.item),
            qty: input.qty,
            rate,
            amount: 0.0,
            pago: false,
            fechapago: None,
            fechaemision: Some(date::format_date(&now.date_naive())),
            timestamp: Some(now.timestamp_millis()),
            extra: Default::default(),
        };
        invoice.amount = invoice.expected_amount();

        let rec = store.push(Collection::Invoices, to_fields(&invoice)?)?;
        success(format!(
            "Invoice {} created, amount {:.2}.",
            invoice.numerodefactura.as_deref().unwrap_or(""),
            invoice.amount
        ));
        Ok(rec)
    }

    /// Invoice for a scheduled job: billed to the job's name and address at
    /// the job's price.
    pub fn from_job(
        store: &CollectionStore,
        sheet: Collection,
        job_id: &str,
        item: Option<&str>,
        now: DateTime<Local>,
    ) -> AppResult<Record> {
        let job: ServiceJob = store.require(sheet, job_id)?.to_model()?;

        let input = NewInvoice {
            anombrede: job.anombrede,
            direccion: job.direccion,
            personalizado: None,
            item: item.map(str::to_string).or(job.servicio),
            qty: 1.0,
            rate: job.valor,
        };

        Self::create(store, &input, now)
    }

    /// Set one field. `qty`, `rate` and `item` recompute `amount` in the same
    /// write; `pago` stamps or clears `fechapago`.
    pub fn set_field(
        store: &CollectionStore,
        id: &str,
        field: InvoiceField,
        raw: &str,
        today: NaiveDate,
    ) -> AppResult<Record> {
        let current = store.require(Collection::Invoices, id)?;
        let mut inv: Invoice = current.to_model()?;
        let key = field.key();

        let mut partial = match field {
            InvoiceField::Qty | InvoiceField::Rate => {
                let v = parse_number_input(key, raw)?;
                let x = v.as_f64().unwrap_or(0.0);
                if x < 0.0 {
                    return Err(AppError::InvalidField(key.into(), raw.into()));
                }
                if field == InvoiceField::Qty {
                    inv.qty = x;
                } else {
                    inv.rate = x;
                }
                fields([(key, number(x))])
            }
            InvoiceField::Item => {
                let item = raw.trim();
                let mut f = fields([("item", Value::from(item))]);
                if let Some(rate) = item_rate(item) {
                    inv.rate = rate;
                    f.insert("rate".into(), number(rate));
                }
                f
            }
            InvoiceField::Pago => {
                let paid = parse_flag_input(key, raw)?;
                let stamp = if paid {
                    Value::from(date::format_date(&today))
                } else {
                    Value::from("")
                };
                fields([("pago", Value::from(paid)), ("fechapago", stamp)])
            }
            InvoiceField::Anombrede | InvoiceField::Direccion | InvoiceField::Personalizado => {
                fields([(key, Value::from(raw.trim()))])
            }
        };

        if matches!(field, InvoiceField::Qty | InvoiceField::Rate | InvoiceField::Item) {
            partial.insert("amount".into(), number(round2(inv.qty * inv.rate)));
        }

        store.write(Collection::Invoices, id, partial)
    }

    /// Invoices, newest number first.
    pub fn list(store: &CollectionStore, filter: PaidFilter) -> AppResult<Vec<(String, Invoice)>> {
        let mut out = Vec::new();
        for rec in store.snapshot(Collection::Invoices)? {
            let inv: Invoice = rec.to_model()?;
            let keep = match filter {
                PaidFilter::All => true,
                PaidFilter::Paid => inv.pago,
                PaidFilter::Unpaid => !inv.pago,
            };
            if keep {
                out.push((rec.id, inv));
            }
        }
        out.sort_by(|(_, a), (_, b)| b.numerodefactura.cmp(&a.numerodefactura));
        Ok(out)
    }

    pub fn totals(invoices: &[(String, Invoice)]) -> InvoiceTotals {
        let mut t = InvoiceTotals {
            count: invoices.len(),
            ..Default::default()
        };
        for (_, inv) in invoices {
            t.amount += inv.amount;
            t.balance_due += inv.balance_due();
        }
        t.amount = round2(t.amount);
        t.balance_due = round2(t.balance_due);
        t
    }

    /// Find an invoice by record id or by invoice number.
    pub fn resolve(store: &CollectionStore, key: &str) -> AppResult<Record> {
        if let Some(rec) = store.get(Collection::Invoices, key)? {
            return Ok(rec);
        }
        store
            .snapshot(Collection::Invoices)?
            .into_iter()
            .find(|r| display_value(r.get("numerodefactura")) == key)
            .ok_or_else(|| AppError::NotFound(format!("invoice '{}'", key)))
    }

    pub fn delete(store: &CollectionStore, key: &str) -> AppResult<Record> {
        let rec = Self::resolve(store, key)?;
        store.remove(Collection::Invoices, &rec.id)?;
        info(format!(
            "Deleted invoice {}.",
            rec.text("numerodefactura").unwrap_or(&rec.id)
        ));
        Ok(rec)
    }

    pub fn letterhead(store: &CollectionStore) -> AppResult<Letterhead> {
        match store.get(Collection::InvoiceConfig, LETTERHEAD_ID)? {
            Some(rec) => rec.to_model(),
            None => Ok(Letterhead::default()),
        }
    }

    /// Merge the given letterhead fields; `None` leaves a field as it is.
    pub fn set_letterhead(store: &CollectionStore, changes: &Letterhead) -> AppResult<Letterhead> {
        let partial = to_fields(changes)?;
        if partial.is_empty() {
            return Self::letterhead(store);
        }
        store
            .write(Collection::InvoiceConfig, LETTERHEAD_ID, partial)?
            .to_model()
    }
}
