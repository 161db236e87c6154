use crate::cli::commands::{close_store, open_store, period_bounds};
use crate::cli::parser::ReportCmd;
use crate::config::Config;
use crate::core::employees::EmployeesLogic;
use crate::core::reports::{services_by_worker, transfers};
use crate::errors::AppResult;
use crate::models::value::round2;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::date::describe_period;
use crate::utils::formatting::{bold, money_with, opt_number};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &ReportCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let cur = &cfg.currency_symbol;

    match cmd {
        ReportCmd::Transfers { period, bank } => {
            let bounds = period_bounds(period)?;
            let groups = transfers(&store, bounds, bank.as_deref())?;
            let names = EmployeesLogic::names(&store)?;

            header(format!("Transfers ({})", describe_period(bounds)));
            if groups.is_empty() {
                info("No transfers.");
            }

            for g in &groups {
                println!("{CYAN}▶ {}{RESET}", g.banco);
                let mut table = Table::new(vec![
                    Column::left("DATE"),
                    Column::left("ADDRESS"),
                    Column::left("NAME"),
                    Column::left("WORKER"),
                    Column::right("VALUE"),
                    Column::left(""),
                ]);
                for rj in &g.jobs {
                    table.add_row(vec![
                        rj.fecha.clone(),
                        rj.job.direccion.clone().unwrap_or_default(),
                        rj.job.anombrede.clone().unwrap_or_default(),
                        EmployeesLogic::display(&names, rj.job.realizadopor.as_deref()),
                        rj.job.valor.map(|v| money_with(cur, v)).unwrap_or_default(),
                        if rj.archived {
                            String::new()
                        } else {
                            format!("{GREY}live{RESET}")
                        },
                    ]);
                }
                print!("{}", table.render());
                println!("  Subtotal: {}\n", money_with(cur, g.total));
            }

            if !groups.is_empty() {
                let total = round2(groups.iter().map(|g| g.total).sum());
                println!("{}", bold(&format!("Total: {}", money_with(cur, total))));
            }
        }
        ReportCmd::Services { period } => {
            let bounds = period_bounds(period)?;
            let summary = services_by_worker(&store, bounds)?;

            header(format!("Services per worker ({})", describe_period(bounds)));
            if summary.is_empty() {
                info("No services.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("WORKER"),
                    Column::right("SERVICES"),
                    Column::right("M3"),
                    Column::right("VALUE"),
                ]);
                for w in &summary {
                    table.add_row(vec![
                        w.name.clone(),
                        w.services.to_string(),
                        opt_number(Some(w.cubicos)),
                        money_with(cur, w.valor),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    close_store(store);
    Ok(())
}
