//! End of day: archive today's sheet and move the planning sheets forward.

use crate::errors::{AppError, AppResult};
use crate::models::cash::CashEntry;
use crate::models::job::ServiceJob;
use crate::models::payment::PaymentMethod;
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, Fields, fields};
use crate::ui::messages::{info, success};
use crate::utils::date;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// `origen` of cash entries created by a rollover.
pub const ROLLOVER_ORIGIN: &str = "rollover";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverSummary {
    pub archived: usize,
    pub cash_entries: usize,
    pub moved_from_tomorrow: usize,
    pub moved_from_day_after: usize,
}

/// A job from the archive, with the day it was archived under.
#[derive(Debug, Clone)]
pub struct ArchivedJob {
    pub fecha: String,
    pub id: String,
    pub job: ServiceJob,
}

/// Every archived job, oldest day first.
pub fn archived_jobs(store: &CollectionStore) -> AppResult<Vec<ArchivedJob>> {
    let mut out = Vec::new();

    for day in store.snapshot(Collection::ArchivedDays)? {
        let fecha = day.text("fecha").unwrap_or(&day.id).to_string();
        let Some(Value::Object(registros)) = day.get("registros") else {
            continue;
        };
        for (id, v) in registros {
            let job: ServiceJob = serde_json::from_value(v.clone()).map_err(|e| {
                AppError::CorruptRecord(format!("{}/{}", day.id, id), e.to_string())
            })?;
            out.push(ArchivedJob {
                fecha: fecha.clone(),
                id: id.clone(),
                job,
            });
        }
    }

    out.sort_by_key(|a| date::parse_date(&a.fecha));
    Ok(out)
}

pub struct RolloverLogic;

impl RolloverLogic {
    pub fn apply(store: &CollectionStore, day: NaiveDate) -> AppResult<RolloverSummary> {
        let fecha = date::format_date(&day);
        let mut summary = RolloverSummary::default();

        // 1. archive today's sheet under the date
        let today = store.snapshot(Collection::Today)?;
        if !today.is_empty() {
            let mut registros: Map<String, Value> = match store.get(Collection::ArchivedDays, &fecha)? {
                Some(existing) => match existing.get("registros") {
                    Some(Value::Object(m)) => m.clone(),
                    _ => Map::new(),
                },
                None => Map::new(),
            };
            for job in &today {
                registros.insert(job.id.clone(), Value::Object(job.fields.clone()));
            }

            store.write(
                Collection::ArchivedDays,
                &fecha,
                fields([
                    ("fecha", Value::from(fecha.clone())),
                    ("registros", Value::Object(registros)),
                ]),
            )?;
            summary.archived = today.len();
        }

        // 2. cash collected by each worker goes to the cash report
        for rec in &today {
            let job: ServiceJob = rec.to_model()?;
            let efectivo = job.efectivo.unwrap_or(0.0);
            if !job.is_cash() || efectivo <= 0.0 || !job.is_assigned() {
                continue;
            }

            let entry = CashEntry {
                fecha: Some(fecha.clone()),
                realizadopor: job.realizadopor.clone(),
                metododepago: Some(PaymentMethod::Efectivo.to_string()),
                efectivo,
                direccion: job.direccion.clone(),
                notas: job.notas.clone(),
                origen: Some(ROLLOVER_ORIGIN.to_string()),
                extra: Default::default(),
            };
            store.push(Collection::CashReport, to_fields(&entry)?)?;
            summary.cash_entries += 1;
        }

        // 3. shift the sheets, keeping job ids
        for rec in &today {
            store.remove(Collection::Today, &rec.id)?;
        }
        summary.moved_from_tomorrow = Self::shift(store, Collection::Tomorrow, Collection::Today)?;
        summary.moved_from_day_after =
            Self::shift(store, Collection::DayAfter, Collection::Tomorrow)?;

        success(format!(
            "Day {} closed: {} jobs archived, {} cash entries.",
            fecha, summary.archived, summary.cash_entries
        ));
        info(format!(
            "Moved {} jobs to today and {} to tomorrow.",
            summary.moved_from_tomorrow, summary.moved_from_day_after
        ));
        Ok(summary)
    }

    fn shift(store: &CollectionStore, from: Collection, to: Collection) -> AppResult<usize> {
        let jobs = store.snapshot(from)?;
        for job in &jobs {
            let moved: Fields = job.fields.clone();
            store.replace(to, &job.id, moved)?;
            store.remove(from, &job.id)?;
        }
        Ok(jobs.len())
    }
}
