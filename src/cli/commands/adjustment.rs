use crate::cli::commands::{close_store, open_store, period_bounds};
use crate::cli::parser::AdjustmentCmd;
use crate::config::Config;
use crate::core::adjustments::{AdjustmentKind, AdjustmentsLogic};
use crate::core::employees::EmployeesLogic;
use crate::errors::AppResult;
use crate::models::value::round2;
use crate::ui::messages::{header, info};
use crate::utils::date::describe_period;
use crate::utils::formatting::{money_with, truncate};
use crate::utils::table::{Column, Table};

/// Shared by `extra` and `deduction`.
pub fn handle(kind: AdjustmentKind, cmd: &AdjustmentCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let cur = &cfg.currency_symbol;

    match cmd {
        AdjustmentCmd::Add {
            employee,
            valor,
            fecha,
            descripcion,
        } => {
            AdjustmentsLogic::add(
                &store,
                kind,
                employee,
                *valor,
                fecha.as_deref(),
                descripcion.as_deref(),
            )?;
        }
        AdjustmentCmd::List { employee, period } => {
            let bounds = period_bounds(period)?;
            let items = AdjustmentsLogic::list(&store, kind, employee.as_deref(), bounds)?;
            let names = EmployeesLogic::names(&store)?;

            header(format!("{} ({})", kind.collection(), describe_period(bounds)));
            if items.is_empty() {
                info("Nothing recorded.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("ID"),
                    Column::left("DATE"),
                    Column::left("EMPLOYEE"),
                    Column::right("VALUE"),
                    Column::left("DESCRIPTION"),
                ]);
                for (id, a) in &items {
                    table.add_row(vec![
                        id.clone(),
                        a.fecha.clone().unwrap_or_default(),
                        EmployeesLogic::display(&names, a.realizado.as_deref()),
                        money_with(cur, a.valor),
                        truncate(a.descripcion.as_deref().unwrap_or(""), 40),
                    ]);
                }
                print!("{}", table.render());
                let total = round2(items.iter().map(|(_, a)| a.valor).sum());
                println!("\nTotal: {}", money_with(cur, total));
            }
        }
        AdjustmentCmd::Del { id } => {
            AdjustmentsLogic::delete(&store, kind, id)?;
        }
    }

    close_store(store);
    Ok(())
}
