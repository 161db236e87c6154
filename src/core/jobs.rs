use crate::core::employees::EmployeesLogic;
use crate::core::propagation::{LookupMode, propagate};
use crate::core::{Page, paginate};
use crate::errors::{AppError, AppResult};
use crate::models::job::{JobField, ServiceJob};
use crate::models::value::{parse_flag_input, parse_number_input};
use crate::store::{Collection, CollectionStore, Fields, Record, fields};
use crate::ui::messages::{info, success};
use crate::utils::date;
use serde_json::Value;
use std::cmp::Ordering;

/// Fields of a freshly added job, in display order.
const JOB_TEMPLATE: [&str; 12] = [
    "realizadopor",
    "direccion",
    "anombrede",
    "servicio",
    "cubicos",
    "valor",
    "pago",
    "formadepago",
    "banco",
    "notas",
    "efectivo",
    "factura",
];

#[derive(Debug, Clone, Default)]
pub struct JobListOptions {
    /// Employee id or name.
    pub worker: Option<String>,
    pub unassigned_first: bool,
    /// 1-based.
    pub page: usize,
    /// 0 shows everything.
    pub page_size: usize,
}

/// Scheduling operations over the three day sheets.
pub struct JobsLogic;

impl JobsLogic {
    fn ensure_sheet(sheet: Collection) -> AppResult<()> {
        if sheet.is_sheet() {
            Ok(())
        } else {
            Err(AppError::UnknownCollection(format!("{} is not a day sheet", sheet)))
        }
    }

    fn template() -> Fields {
        let mut f: Fields = JOB_TEMPLATE
            .iter()
            .map(|k| (k.to_string(), Value::from("")))
            .collect();
        f.insert("factura".into(), Value::from(false));
        f.insert("fecha".into(), Value::from(date::format_date(&date::today())));
        f
    }

    /// Add an empty job ("+" on the sheet).
    pub fn add_empty(store: &CollectionStore, sheet: Collection) -> AppResult<Record> {
        Self::ensure_sheet(sheet)?;
        let rec = store.push(sheet, Self::template())?;
        success(format!("Added empty job {} to {}.", rec.id, sheet));
        Ok(rec)
    }

    /// Add a job with its fields filled in one go. Directory propagation
    /// applies as if each field had been typed in.
    pub fn add_express(
        store: &CollectionStore,
        sheet: Collection,
        input: &[(JobField, String)],
    ) -> AppResult<Record> {
        Self::ensure_sheet(sheet)?;

        let mut changes = Fields::new();
        for (field, raw) in input {
            let (key, value) = Self::field_value(store, *field, raw)?;
            changes.insert(key.to_string(), value);
        }

        let derived = propagate(store, LookupMode::for_sheet(sheet), &Fields::new(), changes)?;

        let mut record = Self::template();
        for (k, v) in derived {
            record.insert(k, v);
        }

        let rec = store.push(sheet, record)?;
        success(format!("Added job {} to {}.", rec.id, sheet));
        Ok(rec)
    }

    /// Stored form of a user-typed value.
    fn field_value(
        store: &CollectionStore,
        field: JobField,
        raw: &str,
    ) -> AppResult<(&'static str, Value)> {
        let key = field.key();
        let value = match field {
            f if f.is_numeric() => parse_number_input(key, raw)?,
            JobField::Factura => Value::from(parse_flag_input(key, raw)?),
            JobField::Fecha if !raw.trim().is_empty() => Value::from(date::normalize(raw)?),
            JobField::Realizadopor if !raw.trim().is_empty() => {
                Value::from(EmployeesLogic::resolve(store, raw.trim())?.id)
            }
            _ => Value::from(raw.trim()),
        };
        Ok((key, value))
    }

    /// Set one field of a job, with directory propagation, in a single write.
    pub fn set_field(
        store: &CollectionStore,
        sheet: Collection,
        id: &str,
        field: JobField,
        raw: &str,
    ) -> AppResult<Record> {
        Self::ensure_sheet(sheet)?;
        let current = store.require(sheet, id)?;

        let (key, value) = Self::field_value(store, field, raw)?;
        let changes = fields([(key, value)]);
        let partial = propagate(store, LookupMode::for_sheet(sheet), &current.fields, changes)?;

        store.write(sheet, id, partial)
    }

    /// Assign a job to a worker (id or name), or unassign with `None`.
    pub fn assign(
        store: &CollectionStore,
        sheet: Collection,
        id: &str,
        worker: Option<&str>,
    ) -> AppResult<Record> {
        Self::ensure_sheet(sheet)?;
        store.require(sheet, id)?;

        let worker_id = match worker {
            Some(w) => EmployeesLogic::resolve(store, w)?.id,
            None => String::new(),
        };

        let rec = store.write(sheet, id, fields([("realizadopor", Value::from(worker_id.clone()))]))?;
        if worker_id.is_empty() {
            info(format!("Job {} is now unassigned.", id));
        } else {
            info(format!("Job {} assigned to {}.", id, worker_id));
        }
        Ok(rec)
    }

    pub fn delete(store: &CollectionStore, sheet: Collection, id: &str) -> AppResult<Record> {
        Self::ensure_sheet(sheet)?;
        let removed = store
            .remove(sheet, id)?
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", sheet, id)))?;
        info(format!("Deleted job {} from {}.", id, sheet));
        Ok(removed)
    }

    /// Jobs of a sheet, assigned before unassigned (or the reverse), then by
    /// address.
    pub fn list(
        store: &CollectionStore,
        sheet: Collection,
        opts: &JobListOptions,
    ) -> AppResult<Page<(String, ServiceJob)>> {
        Self::ensure_sheet(sheet)?;

        let worker_id = match &opts.worker {
            Some(w) => Some(EmployeesLogic::resolve(store, w)?.id),
            None => None,
        };

        let mut jobs: Vec<(String, ServiceJob)> = Vec::new();
        for rec in store.snapshot(sheet)? {
            let job: ServiceJob = rec.to_model()?;
            if let Some(w) = &worker_id
                && job.realizadopor.as_deref() != Some(w.as_str())
            {
                continue;
            }
            jobs.push((rec.id, job));
        }

        sort_jobs(&mut jobs, opts.unassigned_first);
        Ok(paginate(jobs, opts.page, opts.page_size))
    }
}

/// Assigned jobs first (unassigned first when `unassigned_first`), then by
/// address, case-insensitive. Stable for equal keys.
pub fn sort_jobs(jobs: &mut [(String, ServiceJob)], unassigned_first: bool) {
    jobs.sort_by(|(_, a), (_, b)| {
        let by_assignment = match (a.is_assigned(), b.is_assigned()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        };
        let by_assignment = if unassigned_first {
            by_assignment.reverse()
        } else {
            by_assignment
        };

        by_assignment.then_with(|| {
            let da = a.direccion.as_deref().unwrap_or("").to_lowercase();
            let db = b.direccion.as_deref().unwrap_or("").to_lowercase();
            da.cmp(&db)
        })
    });
}
