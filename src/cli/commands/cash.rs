use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::CashCmd;
use crate::config::Config;
use crate::core::cash::CashLogic;
use crate::core::employees::EmployeesLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_balance};
use crate::utils::formatting::{money_with, truncate};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &CashCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let cur = &cfg.currency_symbol;

    match cmd {
        CashCmd::Add {
            employee,
            efectivo,
            fecha,
            metodo,
            direccion,
            notas,
        } => {
            CashLogic::add(
                &store,
                employee,
                *efectivo,
                fecha.as_deref(),
                metodo.as_deref(),
                direccion.as_deref(),
                notas.as_deref(),
            )?;
        }
        CashCmd::Show { employee } => {
            let emp = EmployeesLogic::resolve(&store, employee)?;
            let lines = CashLogic::ledger(&store, &emp.id)?;

            header(format!("Cash report: {}", emp.text("name").unwrap_or(&emp.id)));
            if lines.is_empty() {
                info("No cash entries.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("ID"),
                    Column::left("DATE"),
                    Column::left("METHOD"),
                    Column::right("AMOUNT"),
                    Column::right("BALANCE"),
                    Column::left("ADDRESS"),
                    Column::left("ORIGIN"),
                ]);
                for l in &lines {
                    table.add_row(vec![
                        l.id.clone(),
                        l.entry.fecha.clone().unwrap_or_default(),
                        l.entry.metododepago.clone().unwrap_or_default(),
                        money_with(cur, l.entry.efectivo),
                        money_with(cur, l.balance),
                        truncate(l.entry.direccion.as_deref().unwrap_or(""), 30),
                        l.entry.origen.clone().unwrap_or_default(),
                    ]);
                }
                print!("{}", table.render());

                let balance = lines.last().map(|l| l.balance).unwrap_or(0.0);
                println!(
                    "\nCash held: {}{}{}",
                    color_for_balance(balance),
                    money_with(cur, balance),
                    RESET
                );
            }
        }
        CashCmd::Del { id } => {
            CashLogic::delete(&store, id)?;
        }
    }

    close_store(store);
    Ok(())
}
