use crate::errors::{AppError, AppResult};
use crate::models::expense::{Expense, ExpenseField};
use crate::models::payment::PaymentMethod;
use crate::models::value::{parse_number_input, round2};
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, Record, fields};
use crate::ui::messages::{info, success};
use crate::utils::date;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;

/// Label used for expenses with no payment method.
pub const NO_METHOD: &str = "sin método";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExpenseGrouping {
    Date,
    Method,
}

/// One group of expenses with its subtotal.
#[derive(Debug, Clone)]
pub struct ExpenseGroup {
    pub key: String,
    pub expenses: Vec<(String, Expense)>,
    pub total: f64,
}

pub struct ExpensesLogic;

impl ExpensesLogic {
    /// Record an expense. The amount is required; an empty date means today.
    pub fn add(store: &CollectionStore, mut expense: Expense) -> AppResult<Record> {
        if expense.monto == 0.0 {
            return Err(AppError::Required("monto".into()));
        }

        expense.fecha = Some(match expense.fecha.as_deref() {
            Some(d) if !d.trim().is_empty() => date::normalize(d)?,
            _ => date::format_date(&date::today()),
        });
        expense.timestamp = Some(Local::now().timestamp_millis());

        let rec = store.push(Collection::Expenses, to_fields(&expense)?)?;
        success(format!(
            "Expense of {:.2} recorded for {}.",
            expense.monto,
            expense.fecha.as_deref().unwrap_or("")
        ));
        Ok(rec)
    }

    pub fn set_field(
        store: &CollectionStore,
        id: &str,
        field: ExpenseField,
        raw: &str,
    ) -> AppResult<Record> {
        store.require(Collection::Expenses, id)?;

        let key = field.key();
        let value = match field {
            ExpenseField::Monto => {
                let v = parse_number_input(key, raw)?;
                if v.is_null() {
                    return Err(AppError::Required("monto".into()));
                }
                v
            }
            ExpenseField::Fecha => Value::from(date::normalize(raw)?),
            _ => Value::from(raw.trim()),
        };

        store.write(Collection::Expenses, id, fields([(key, value)]))
    }

    pub fn delete(store: &CollectionStore, id: &str) -> AppResult<Record> {
        let removed = store
            .remove(Collection::Expenses, id)?
            .ok_or_else(|| AppError::NotFound(format!("gastos/{}", id)))?;
        info(format!("Deleted expense {}.", id));
        Ok(removed)
    }

    /// Expenses in the range (all when `None`), oldest first.
    pub fn list(
        store: &CollectionStore,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<(String, Expense)>> {
        let mut out = Vec::new();
        for rec in store.snapshot(Collection::Expenses)? {
            let e: Expense = rec.to_model()?;
            if date::matches_range(e.fecha.as_deref(), bounds) {
                out.push((rec.id, e));
            }
        }
        out.sort_by_key(|(_, e)| (e.fecha.as_deref().and_then(date::parse_date), e.timestamp));
        Ok(out)
    }

    /// Split into groups by date (chronological) or by payment method
    /// (alphabetical), each with its subtotal.
    pub fn group(expenses: &[(String, Expense)], by: ExpenseGrouping) -> Vec<ExpenseGroup> {
        let mut groups: BTreeMap<(Option<NaiveDate>, String), Vec<(String, Expense)>> =
            BTreeMap::new();

        for (id, e) in expenses {
            let key = match by {
                ExpenseGrouping::Date => {
                    let raw = e.fecha.clone().unwrap_or_default();
                    (date::parse_date(&raw), raw)
                }
                ExpenseGrouping::Method => (
                    None,
                    e.metodo_pago
                        .as_deref()
                        .and_then(PaymentMethod::parse)
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| NO_METHOD.to_string()),
                ),
            };
            groups.entry(key).or_default().push((id.clone(), e.clone()));
        }

        groups
            .into_iter()
            .map(|((_, key), expenses)| {
                let total = round2(expenses.iter().map(|(_, e)| e.monto).sum());
                ExpenseGroup {
                    key,
                    expenses,
                    total,
                }
            })
            .collect()
    }

    pub fn grand_total(expenses: &[(String, Expense)]) -> f64 {
        round2(expenses.iter().map(|(_, e)| e.monto).sum())
    }
}
