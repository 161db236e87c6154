pub mod adjustment;
pub mod backup;
pub mod cash;
pub mod client;
pub mod config;
pub mod day;
pub mod db;
pub mod expense;
pub mod export;
pub mod history;
pub mod init;
pub mod invoice;
pub mod job;
pub mod log;
pub mod payroll;
pub mod report;
pub mod user;

use crate::config::Config;
use crate::core::tracker::TrackedStore;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use crate::utils::date;
use chrono::NaiveDate;

/// Open the configured store with the history tracker attached.
pub(crate) fn open_store(cfg: &Config) -> AppResult<TrackedStore> {
    TrackedStore::open(cfg)
}

/// Close the store, waiting for the history of this command to be written.
pub(crate) fn close_store(store: TrackedStore) {
    if let Some(stats) = store.close()
        && stats.failures > 0
    {
        warning(format!(
            "{} changes could not be recorded in the history.",
            stats.failures
        ));
    }
}

/// `--period` as date bounds; no period means all dates.
pub(crate) fn period_bounds(period: &Option<String>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match period.as_deref() {
        None => Ok(None),
        Some(p) if p.eq_ignore_ascii_case("all") => Ok(None),
        Some(p) => Ok(Some(date::parse_period(p)?)),
    }
}
