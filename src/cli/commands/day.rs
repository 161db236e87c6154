use crate::cli::commands::{close_store, open_store, period_bounds};
use crate::cli::parser::DayCmd;
use crate::config::Config;
use crate::core::rollover::{RolloverLogic, archived_jobs};
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::value::round2;
use crate::store::Collection;
use crate::ui::messages::{confirm, header, info, warning};
use crate::utils::date;
use crate::utils::formatting::money_with;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &DayCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    match cmd {
        DayCmd::Rollover { date: raw, yes } => {
            let day = match raw {
                Some(d) => date::require_date(d)?,
                None => date::today(),
            };
            let fecha = date::format_date(&day);
            let pending = store.snapshot(Collection::Today)?.len();

            let proceed = *yes
                || confirm(format!(
                    "Close {}: archive {} jobs and move tomorrow's sheet to today",
                    fecha, pending
                ))?;

            if proceed {
                let summary = RolloverLogic::apply(&store, day)?;
                ttlog_quiet(
                    store.conn(),
                    "rollover",
                    &fecha,
                    &format!(
                        "{} archived, {} cash entries, {} + {} moved",
                        summary.archived,
                        summary.cash_entries,
                        summary.moved_from_tomorrow,
                        summary.moved_from_day_after
                    ),
                );
            } else {
                warning("Rollover cancelled.");
            }
        }
        DayCmd::Archive { period } => {
            let bounds = period_bounds(period)?;
            let jobs = archived_jobs(&store)?;

            // (date, jobs, value) in archive order
            let mut days: Vec<(String, usize, f64)> = Vec::new();
            for a in jobs.iter().filter(|a| date::matches_range(Some(&a.fecha), bounds)) {
                match days.last_mut() {
                    Some((d, n, v)) if *d == a.fecha => {
                        *n += 1;
                        *v = round2(*v + a.job.valor.unwrap_or(0.0));
                    }
                    _ => days.push((a.fecha.clone(), 1, a.job.valor.unwrap_or(0.0))),
                }
            }

            header(format!("Archived days ({})", date::describe_period(bounds)));
            if days.is_empty() {
                info("No archived days.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("DATE"),
                    Column::right("JOBS"),
                    Column::right("VALUE"),
                ]);
                for (d, n, v) in &days {
                    table.add_row(vec![d.clone(), n.to_string(), money_with(&cfg.currency_symbol, *v)]);
                }
                print!("{}", table.render());
            }
        }
    }

    close_store(store);
    Ok(())
}
