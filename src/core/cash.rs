use crate::core::employees::EmployeesLogic;
use crate::errors::{AppError, AppResult};
use crate::models::cash::CashEntry;
use crate::models::payment::PaymentMethod;
use crate::models::value::round2;
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, Record};
use crate::ui::messages::{info, success};
use crate::utils::date;

/// `origen` of entries typed in by hand.
pub const MANUAL_ORIGIN: &str = "manual";

/// Cash entry with the worker's balance after it.
#[derive(Debug, Clone)]
pub struct CashLine {
    pub id: String,
    pub entry: CashEntry,
    pub balance: f64,
}

/// Cash entries of one employee in ascending date order; entries without a
/// readable date go last, in insertion order.
fn ordered_for<'a>(
    entries: &'a [(String, CashEntry)],
    employee_id: &str,
) -> Vec<&'a (String, CashEntry)> {
    let mut mine: Vec<&(String, CashEntry)> = entries
        .iter()
        .filter(|(_, e)| e.realizadopor.as_deref() == Some(employee_id))
        .collect();
    mine.sort_by_key(|(_, e)| {
        let d = e.fecha.as_deref().and_then(date::parse_date);
        (d.is_none(), d)
    });
    mine
}

/// Cash still held by an employee: the running sum of `efectivo` over their
/// cash-method entries, across all history.
pub fn cash_balance(entries: &[(String, CashEntry)], employee_id: &str) -> f64 {
    ordered_for(entries, employee_id)
        .into_iter()
        .filter(|(_, e)| e.is_cash())
        .fold(0.0, |acc, (_, e)| round2(acc + e.efectivo))
}

pub struct CashLogic;

impl CashLogic {
    /// Add a cash report entry. Positive amounts are cash collected,
    /// negative ones cash handed in.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        store: &CollectionStore,
        employee: &str,
        efectivo: f64,
        fecha: Option<&str>,
        metodo: Option<&str>,
        direccion: Option<&str>,
        notas: Option<&str>,
    ) -> AppResult<Record> {
        let emp = EmployeesLogic::resolve(store, employee)?;

        let fecha = match fecha {
            Some(d) => date::normalize(d)?,
            None => date::format_date(&date::today()),
        };
        let metodo = metodo
            .and_then(PaymentMethod::parse)
            .unwrap_or(PaymentMethod::Efectivo);

        let clean = |s: Option<&str>| s.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);

        let entry = CashEntry {
            fecha: Some(fecha.clone()),
            realizadopor: Some(emp.id.clone()),
            metododepago: Some(metodo.to_string()),
            efectivo,
            direccion: clean(direccion),
            notas: clean(notas),
            origen: Some(MANUAL_ORIGIN.to_string()),
            extra: Default::default(),
        };

        let rec = store.push(Collection::CashReport, to_fields(&entry)?)?;
        success(format!(
            "Cash entry of {:.2} for {} on {}.",
            efectivo,
            emp.text("name").unwrap_or(&emp.id),
            fecha
        ));
        Ok(rec)
    }

    pub fn load(store: &CollectionStore) -> AppResult<Vec<(String, CashEntry)>> {
        store
            .snapshot(Collection::CashReport)?
            .into_iter()
            .map(|r| Ok((r.id.clone(), r.to_model::<CashEntry>()?)))
            .collect()
    }

    /// Entries of one employee with the running balance. Non-cash entries
    /// are listed but leave the balance unchanged.
    pub fn ledger(store: &CollectionStore, employee: &str) -> AppResult<Vec<CashLine>> {
        let emp = EmployeesLogic::resolve(store, employee)?;
        let entries = Self::load(store)?;

        let mut balance = 0.0;
        Ok(ordered_for(&entries, &emp.id)
            .into_iter()
            .map(|(id, e)| {
                if e.is_cash() {
                    balance = round2(balance + e.efectivo);
                }
                CashLine {
                    id: id.clone(),
                    entry: e.clone(),
                    balance,
                }
            })
            .collect())
    }

    pub fn delete(store: &CollectionStore, id: &str) -> AppResult<Record> {
        let removed = store
            .remove(Collection::CashReport, id)?
            .ok_or_else(|| AppError::NotFound(format!("informedeefectivo/{}", id)))?;
        info(format!("Deleted cash entry {}.", id));
        Ok(removed)
    }
}
