use crate::core::employees::EmployeesLogic;
use crate::errors::{AppError, AppResult};
use crate::models::adjustment::Adjustment;
use crate::models::value::round2;
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, Record};
use crate::ui::messages::{info, success};
use crate::utils::date;
use chrono::NaiveDate;

/// Payroll extras (`extras`) and deductions (`deducciones`) share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Extra,
    Deduction,
}

impl AdjustmentKind {
    pub fn collection(&self) -> Collection {
        match self {
            AdjustmentKind::Extra => Collection::Extras,
            AdjustmentKind::Deduction => Collection::Deductions,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdjustmentKind::Extra => "extra",
            AdjustmentKind::Deduction => "deduction",
        }
    }
}

/// Sum of `valor` over the adjustments of `employee_id` dated inside
/// `[from, to]`. Undated or unparseable entries never count.
pub fn sum_adjustments(
    adjustments: &[Adjustment],
    employee_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> f64 {
    round2(
        adjustments
            .iter()
            .filter(|a| a.realizado.as_deref() == Some(employee_id))
            .filter(|a| date::matches_range(a.fecha.as_deref(), Some((from, to))))
            .map(|a| a.valor)
            .sum(),
    )
}

pub struct AdjustmentsLogic;

impl AdjustmentsLogic {
    pub fn add(
        store: &CollectionStore,
        kind: AdjustmentKind,
        employee: &str,
        valor: f64,
        fecha: Option<&str>,
        descripcion: Option<&str>,
    ) -> AppResult<Record> {
        let emp = EmployeesLogic::resolve(store, employee)?;

        let fecha = match fecha {
            Some(d) => date::normalize(d)?,
            None => date::format_date(&date::today()),
        };

        let adj = Adjustment {
            fecha: Some(fecha.clone()),
            realizado: Some(emp.id.clone()),
            valor,
            descripcion: descripcion
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            extra: Default::default(),
        };

        let rec = store.push(kind.collection(), to_fields(&adj)?)?;
        success(format!(
            "Recorded {} of {:.2} for {} on {}.",
            kind.label(),
            valor,
            emp.text("name").unwrap_or(&emp.id),
            fecha
        ));
        Ok(rec)
    }

    /// All adjustments of a kind as typed values.
    pub fn load(store: &CollectionStore, kind: AdjustmentKind) -> AppResult<Vec<Adjustment>> {
        store
            .snapshot(kind.collection())?
            .iter()
            .map(Record::to_model::<Adjustment>)
            .collect()
    }

    /// Adjustments filtered by employee and date range, oldest first.
    pub fn list(
        store: &CollectionStore,
        kind: AdjustmentKind,
        employee: Option<&str>,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<(String, Adjustment)>> {
        let employee_id = match employee {
            Some(e) => Some(EmployeesLogic::resolve(store, e)?.id),
            None => None,
        };

        let mut out = Vec::new();
        for rec in store.snapshot(kind.collection())? {
            let a: Adjustment = rec.to_model()?;
            if employee_id
                .as_deref()
                .is_some_and(|id| a.realizado.as_deref() != Some(id))
            {
                continue;
            }
            if date::matches_range(a.fecha.as_deref(), bounds) {
                out.push((rec.id, a));
            }
        }
        out.sort_by_key(|(_, a)| a.fecha.as_deref().and_then(date::parse_date));
        Ok(out)
    }

    pub fn delete(store: &CollectionStore, kind: AdjustmentKind, id: &str) -> AppResult<Record> {
        let removed = store
            .remove(kind.collection(), id)?
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", kind.collection(), id)))?;
        info(format!("Deleted {} {}.", kind.label(), id));
        Ok(removed)
    }
}
