//! Payroll runs (`nominas`).
//!
//! A row's `extra`, `deducciones` and `efectivo` are aggregated from other
//! collections for the row's employee; the totals follow from them by
//! [`PayrollRow::recompute`]. Rows can be locked while a run is being
//! closed: a locked row ignores every edit, including reassignment.

use crate::core::adjustments::{AdjustmentKind, AdjustmentsLogic, sum_adjustments};
use crate::core::cash::{CashLogic, cash_balance};
use crate::core::employees::EmployeesLogic;
use crate::errors::{AppError, AppResult};
use crate::models::adjustment::Adjustment;
use crate::models::cash::CashEntry;
use crate::models::payroll::{PayrollField, PayrollRow, PayrollRun};
use crate::models::value::round2;
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, Record, fields};
use crate::ui::messages::{info, success, warning};
use crate::utils::date;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Everything the aggregations read, loaded once per command.
#[derive(Debug, Clone, Default)]
pub struct PayrollInputs {
    pub extras: Vec<Adjustment>,
    pub deductions: Vec<Adjustment>,
    pub cash: Vec<(String, CashEntry)>,
}

impl PayrollInputs {
    pub fn load(store: &CollectionStore) -> AppResult<Self> {
        Ok(Self {
            extras: AdjustmentsLogic::load(store, AdjustmentKind::Extra)?,
            deductions: AdjustmentsLogic::load(store, AdjustmentKind::Deduction)?,
            cash: CashLogic::load(store)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregates {
    pub extra: f64,
    pub deducciones: f64,
    pub efectivo: f64,
}

/// Extras and deductions of `employee_id` inside `[from, to]`, and the
/// employee's cash balance over all history.
pub fn aggregate_for(
    inputs: &PayrollInputs,
    employee_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Aggregates {
    Aggregates {
        extra: sum_adjustments(&inputs.extras, employee_id, from, to),
        deducciones: sum_adjustments(&inputs.deductions, employee_id, from, to),
        efectivo: cash_balance(&inputs.cash, employee_id),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayrollTotals {
    pub total_quincena: f64,
    pub extra: f64,
    pub deducciones: f64,
    pub total_nomina: f64,
    pub efectivo: f64,
    pub total: f64,
    pub entregado: f64,
    pub balance: f64,
}

/// A payroll run being edited, with its transient row locks.
#[derive(Debug, Clone)]
pub struct PayrollSheet {
    pub id: String,
    pub run: PayrollRun,
    locked: HashSet<String>,
}

impl PayrollSheet {
    /// Create an empty run for `[desde, hasta]`. Rejects a reversed range and
    /// a run that already exists.
    pub fn create(
        store: &CollectionStore,
        desde: &str,
        hasta: &str,
        today: NaiveDate,
    ) -> AppResult<Self> {
        let from = date::require_date(desde)?;
        let to = date::require_date(hasta)?;
        if from > to {
            return Err(AppError::InvalidRange(format!(
                "{} is after {}",
                date::format_date(&from),
                date::format_date(&to)
            )));
        }

        let fecha_desde = date::format_date(&from);
        let fecha_hasta = date::format_date(&to);
        let id = PayrollRun::run_id(&fecha_desde, &fecha_hasta);

        if store.get(Collection::Payroll, &id)?.is_some() {
            return Err(AppError::AlreadyExists(format!("payroll run {}", id)));
        }

        let run = PayrollRun {
            fecha_desde,
            fecha_hasta,
            fecha_creacion: date::format_date(&today),
            registros: Default::default(),
            extra: Default::default(),
        };
        store.replace(Collection::Payroll, &id, to_fields(&run)?)?;
        success(format!("Payroll run {} created.", id));

        Ok(Self {
            id,
            run,
            locked: HashSet::new(),
        })
    }

    pub fn load(store: &CollectionStore, id: &str) -> AppResult<Self> {
        let run: PayrollRun = store.require(Collection::Payroll, id)?.to_model()?;
        Ok(Self {
            id: id.to_string(),
            run,
            locked: HashSet::new(),
        })
    }

    pub fn bounds(&self) -> AppResult<(NaiveDate, NaiveDate)> {
        Ok((
            date::require_date(&self.run.fecha_desde)?,
            date::require_date(&self.run.fecha_hasta)?,
        ))
    }

    pub fn row(&self, row_id: &str) -> AppResult<&PayrollRow> {
        self.run
            .registros
            .get(row_id)
            .ok_or_else(|| AppError::NotFound(format!("payroll row {}", row_id)))
    }

    fn row_mut(&mut self, row_id: &str) -> AppResult<&mut PayrollRow> {
        self.run
            .registros
            .get_mut(row_id)
            .ok_or_else(|| AppError::NotFound(format!("payroll row {}", row_id)))
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &PayrollRow)> {
        self.run.registros.iter()
    }

    /// Add a row, aggregated for `employee_id` when given.
    pub fn add_row(
        &mut self,
        row_id: String,
        inputs: &PayrollInputs,
        employee_id: Option<&str>,
        dias: f64,
        valor: f64,
    ) -> AppResult<String> {
        if self.run.registros.contains_key(&row_id) {
            return Err(AppError::AlreadyExists(format!("payroll row {}", row_id)));
        }

        let mut row = PayrollRow {
            dias,
            valor,
            ..Default::default()
        };
        if let Some(emp) = employee_id {
            let (from, to) = self.bounds()?;
            apply_aggregates(&mut row, emp, aggregate_for(inputs, emp, from, to));
        }
        row.recompute();

        self.run.registros.insert(row_id.clone(), row);
        Ok(row_id)
    }

    /// Remove a row. Locked rows stay; returns whether it was removed.
    pub fn remove_row(&mut self, row_id: &str) -> AppResult<bool> {
        self.row(row_id)?;
        if self.is_locked(row_id) {
            return Ok(false);
        }
        self.run.registros.remove(row_id);
        Ok(true)
    }

    pub fn lock(&mut self, row_id: &str) -> AppResult<()> {
        self.row(row_id)?;
        self.locked.insert(row_id.to_string());
        Ok(())
    }

    pub fn unlock(&mut self, row_id: &str) -> AppResult<()> {
        self.row(row_id)?;
        self.locked.remove(row_id);
        Ok(())
    }

    pub fn is_locked(&self, row_id: &str) -> bool {
        self.locked.contains(row_id)
    }

    /// Assign the row to `employee_id` and re-run its aggregations. Returns
    /// `false` (and changes nothing) when the row is locked.
    pub fn set_employee(
        &mut self,
        inputs: &PayrollInputs,
        row_id: &str,
        employee_id: &str,
    ) -> AppResult<bool> {
        if self.is_locked(row_id) {
            self.row(row_id)?;
            return Ok(false);
        }

        let (from, to) = self.bounds()?;
        let agg = aggregate_for(inputs, employee_id, from, to);
        let row = self.row_mut(row_id)?;
        apply_aggregates(row, employee_id, agg);
        row.recompute();
        Ok(true)
    }

    /// Set one numeric input of a row and recompute its totals. Returns
    /// `false` when the row is locked.
    pub fn set_amount(&mut self, row_id: &str, field: PayrollField, value: f64) -> AppResult<bool> {
        if self.is_locked(row_id) {
            self.row(row_id)?;
            return Ok(false);
        }
        field.apply(self.row_mut(row_id)?, value);
        Ok(true)
    }

    /// Re-aggregate every unlocked, assigned row from current data. Returns
    /// the number of rows refreshed.
    pub fn refresh(&mut self, inputs: &PayrollInputs) -> AppResult<usize> {
        let (from, to) = self.bounds()?;
        let mut n = 0;

        for (id, row) in self.run.registros.iter_mut() {
            if self.locked.contains(id) {
                continue;
            }
            let Some(emp) = row.nombre.clone() else {
                continue;
            };
            let agg = aggregate_for(inputs, &emp, from, to);
            apply_aggregates(row, &emp, agg);
            row.recompute();
            n += 1;
        }
        Ok(n)
    }

    pub fn totals(&self) -> PayrollTotals {
        let mut t = PayrollTotals::default();
        for row in self.run.registros.values() {
            t.total_quincena += row.total_quincena;
            t.extra += row.extra;
            t.deducciones += row.deducciones;
            t.total_nomina += row.total_nomina;
            t.efectivo += row.efectivo;
            t.total += row.total;
            t.entregado += row.entregado;
            t.balance += row.balance();
        }
        PayrollTotals {
            total_quincena: round2(t.total_quincena),
            extra: round2(t.extra),
            deducciones: round2(t.deducciones),
            total_nomina: round2(t.total_nomina),
            efectivo: round2(t.efectivo),
            total: round2(t.total),
            entregado: round2(t.entregado),
            balance: round2(t.balance),
        }
    }

    /// Write the rows back to the run.
    pub fn persist(&self, store: &CollectionStore) -> AppResult<Record> {
        let registros = serde_json::to_value(&self.run.registros)?;
        store.write(
            Collection::Payroll,
            &self.id,
            fields([("registros", registros)]),
        )
    }
}

fn apply_aggregates(row: &mut PayrollRow, employee_id: &str, agg: Aggregates) {
    row.nombre = Some(employee_id.to_string());
    row.extra = agg.extra;
    row.deducciones = agg.deducciones;
    row.efectivo = agg.efectivo;
}

pub struct PayrollLogic;

impl PayrollLogic {
    /// One row per active employee, each aggregated.
    pub fn add_all_employees(
        store: &CollectionStore,
        sheet: &mut PayrollSheet,
        inputs: &PayrollInputs,
        dias: f64,
        valor: f64,
    ) -> AppResult<usize> {
        let present: HashSet<String> = sheet
            .rows()
            .filter_map(|(_, r)| r.nombre.clone())
            .collect();

        let mut added = 0;
        for (emp_id, _) in EmployeesLogic::list(store, false)? {
            if present.contains(&emp_id) {
                continue;
            }
            sheet.add_row(store.create_id(), inputs, Some(&emp_id), dias, valor)?;
            added += 1;
        }
        Ok(added)
    }

    /// Runs, most recent period first.
    pub fn list(store: &CollectionStore) -> AppResult<Vec<(String, PayrollRun)>> {
        let mut out = Vec::new();
        for rec in store.snapshot(Collection::Payroll)? {
            let run: PayrollRun = rec.to_model()?;
            out.push((rec.id, run));
        }
        out.sort_by_key(|(_, r)| std::cmp::Reverse(date::parse_date(&r.fecha_desde)));
        Ok(out)
    }

    pub fn delete(store: &CollectionStore, id: &str) -> AppResult<Record> {
        let removed = store
            .remove(Collection::Payroll, id)?
            .ok_or_else(|| AppError::NotFound(format!("nominas/{}", id)))?;
        info(format!("Deleted payroll run {}.", id));
        Ok(removed)
    }

    /// Refresh every row of a run except `keep`, then save it.
    pub fn refresh_run(
        store: &CollectionStore,
        id: &str,
        keep: &[String],
    ) -> AppResult<PayrollSheet> {
        let mut sheet = PayrollSheet::load(store, id)?;
        for row_id in keep {
            sheet.lock(row_id)?;
        }

        let inputs = PayrollInputs::load(store)?;
        let n = sheet.refresh(&inputs)?;
        sheet.persist(store)?;

        if keep.is_empty() {
            success(format!("Payroll run {}: {} rows refreshed.", id, n));
        } else {
            warning(format!(
                "Payroll run {}: {} rows refreshed, {} kept as they were.",
                id,
                n,
                keep.len()
            ));
        }
        Ok(sheet)
    }
}
