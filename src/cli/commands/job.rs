use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::JobCmd;
use crate::config::Config;
use crate::core::employees::EmployeesLogic;
use crate::core::jobs::{JobListOptions, JobsLogic};
use crate::errors::{AppError, AppResult};
use crate::models::job::JobField;
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::{money_with, opt_number, truncate};
use crate::utils::table::{Column, Table};
use clap::ValueEnum;

/// `FIELD=VALUE` pairs of `job add --set`.
fn parse_assignments(raw: &[String]) -> AppResult<Vec<(JobField, String)>> {
    raw.iter()
        .map(|pair| {
            let (k, v) = pair.split_once('=').ok_or_else(|| {
                AppError::InvalidField(pair.clone(), "expected FIELD=VALUE".into())
            })?;
            let field = JobField::from_str(k.trim(), true)
                .map_err(|_| AppError::InvalidField(k.trim().to_string(), "unknown job field".into()))?;
            Ok((field, v.to_string()))
        })
        .collect()
}

pub fn handle(cmd: &JobCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    match cmd {
        JobCmd::Add { sheet, set } => {
            if set.is_empty() {
                JobsLogic::add_empty(&store, sheet.collection())?;
            } else {
                let input = parse_assignments(set)?;
                JobsLogic::add_express(&store, sheet.collection(), &input)?;
            }
        }
        JobCmd::Set {
            id,
            field,
            value,
            sheet,
        } => {
            let rec = JobsLogic::set_field(&store, sheet.collection(), id, *field, value)?;
            info(format!(
                "{} of job {} set to \"{}\".",
                field.key(),
                rec.id,
                value.trim()
            ));
        }
        JobCmd::Assign { id, worker, sheet } => {
            JobsLogic::assign(&store, sheet.collection(), id, worker.as_deref())?;
        }
        JobCmd::Del { id, sheet } => {
            JobsLogic::delete(&store, sheet.collection(), id)?;
        }
        JobCmd::List {
            sheet,
            worker,
            unassigned_first,
            page,
            page_size,
        } => {
            let opts = JobListOptions {
                worker: worker.clone(),
                unassigned_first: *unassigned_first,
                page: *page,
                page_size: page_size.unwrap_or(cfg.page_size),
            };
            let listing = JobsLogic::list(&store, sheet.collection(), &opts)?;
            let names = EmployeesLogic::names(&store)?;

            header(format!("Jobs in {}", sheet.collection()));

            if listing.items.is_empty() {
                info("No jobs.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("ID"),
                    Column::left("WORKER"),
                    Column::left("ADDRESS"),
                    Column::left("NAME"),
                    Column::left("SERVICE"),
                    Column::right("M3"),
                    Column::right("VALUE"),
                    Column::left("PAYMENT"),
                    Column::right("CASH"),
                    Column::left("INV"),
                ]);

                let cur = &cfg.currency_symbol;
                for (id, job) in &listing.items {
                    table.add_row(vec![
                        id.clone(),
                        colorize_optional(&EmployeesLogic::display(&names, job.realizadopor.as_deref())),
                        truncate(job.direccion.as_deref().unwrap_or(""), 32),
                        truncate(job.anombrede.as_deref().unwrap_or(""), 24),
                        job.servicio.clone().unwrap_or_default(),
                        opt_number(job.cubicos),
                        job.valor.map(|v| money_with(cur, v)).unwrap_or_default(),
                        job.payment_method().map(|m| m.to_string()).unwrap_or_default(),
                        job.efectivo.map(|v| money_with(cur, v)).unwrap_or_default(),
                        if job.factura { "✔".into() } else { String::new() },
                    ]);
                }
                print!("{}", table.render());
            }

            println!(
                "\nPage {}/{} ({} jobs)",
                listing.page, listing.pages, listing.total
            );
        }
    }

    close_store(store);
    Ok(())
}
