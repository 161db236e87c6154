//! Read-only views over the live sheet and the archive.

use crate::core::employees::EmployeesLogic;
use crate::core::rollover::archived_jobs;
use crate::errors::AppResult;
use crate::models::job::ServiceJob;
use crate::models::payment::PaymentMethod;
use crate::models::value::round2;
use crate::store::{Collection, CollectionStore};
use crate::utils::date;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Label for transfers without a bank.
pub const NO_BANK: &str = "sin banco";
/// Label for jobs nobody was assigned to.
pub const UNASSIGNED: &str = "sin asignar";

/// A job as seen by the reports, live or archived.
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub fecha: String,
    pub id: String,
    pub archived: bool,
    pub job: ServiceJob,
}

/// Today's jobs followed by the archive. Live jobs without a date count as
/// today.
pub fn all_jobs(store: &CollectionStore) -> AppResult<Vec<ReportJob>> {
    let mut out: Vec<ReportJob> = archived_jobs(store)?
        .into_iter()
        .map(|a| ReportJob {
            fecha: a.fecha,
            id: a.id,
            archived: true,
            job: a.job,
        })
        .collect();

    let today = date::format_date(&date::today());
    for rec in store.snapshot(Collection::Today)? {
        let job: ServiceJob = rec.to_model()?;
        out.push(ReportJob {
            fecha: job.fecha.clone().unwrap_or_else(|| today.clone()),
            id: rec.id,
            archived: false,
            job,
        });
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct TransferGroup {
    pub banco: String,
    pub jobs: Vec<ReportJob>,
    pub total: f64,
}

/// Jobs paid by transfer, grouped by bank (alphabetical), each group in date
/// order.
pub fn transfers(
    store: &CollectionStore,
    bounds: Option<(NaiveDate, NaiveDate)>,
    bank: Option<&str>,
) -> AppResult<Vec<TransferGroup>> {
    let bank = bank.map(|b| b.trim().to_lowercase());
    let mut groups: BTreeMap<String, Vec<ReportJob>> = BTreeMap::new();

    for rj in all_jobs(store)? {
        if rj.job.payment_method() != Some(PaymentMethod::Transferencia) {
            continue;
        }
        if !date::matches_range(Some(&rj.fecha), bounds) {
            continue;
        }
        let banco = rj
            .job
            .banco
            .clone()
            .unwrap_or_else(|| NO_BANK.to_string());
        if bank.as_ref().is_some_and(|b| banco.to_lowercase() != *b) {
            continue;
        }
        groups.entry(banco).or_default().push(rj);
    }

    Ok(groups
        .into_iter()
        .map(|(banco, mut jobs)| {
            jobs.sort_by_key(|j| date::parse_date(&j.fecha));
            let total = round2(jobs.iter().map(|j| j.job.valor.unwrap_or(0.0)).sum());
            TransferGroup { banco, jobs, total }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSummary {
    pub worker_id: String,
    pub name: String,
    pub services: usize,
    pub cubicos: f64,
    pub valor: f64,
}

/// Services done by each worker in the range, by name.
pub fn services_by_worker(
    store: &CollectionStore,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<WorkerSummary>> {
    let names = EmployeesLogic::names(store)?;
    let mut by_worker: BTreeMap<String, WorkerSummary> = BTreeMap::new();

    for rj in all_jobs(store)? {
        if !date::matches_range(Some(&rj.fecha), bounds) {
            continue;
        }
        let worker_id = rj.job.realizadopor.clone().unwrap_or_default();
        let entry = by_worker.entry(worker_id.clone()).or_insert_with(|| {
            let name = if worker_id.is_empty() {
                UNASSIGNED.to_string()
            } else {
                EmployeesLogic::display(&names, Some(&worker_id))
            };
            WorkerSummary {
                worker_id: worker_id.clone(),
                name,
                services: 0,
                cubicos: 0.0,
                valor: 0.0,
            }
        });
        entry.services += 1;
        entry.cubicos = round2(entry.cubicos + rj.job.cubicos.unwrap_or(0.0));
        entry.valor = round2(entry.valor + rj.job.valor.unwrap_or(0.0));
    }

    let mut out: Vec<WorkerSummary> = by_worker.into_values().collect();
    out.sort_by_key(|w| (w.worker_id.is_empty(), w.name.to_lowercase()));
    Ok(out)
}
