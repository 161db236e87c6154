use crate::cli::commands::{close_store, open_store, period_bounds};
use crate::cli::parser::ExpenseCmd;
use crate::config::Config;
use crate::core::expenses::ExpensesLogic;
use crate::errors::AppResult;
use crate::models::expense::Expense;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, RESET};
use crate::utils::date::describe_period;
use crate::utils::formatting::{bold, money_with, truncate};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &ExpenseCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let cur = &cfg.currency_symbol;

    match cmd {
        ExpenseCmd::Add {
            monto,
            fecha,
            categoria,
            descripcion,
            proveedor,
            metodo_pago,
            banco,
            num_factura,
            responsable,
        } => {
            let expense = Expense {
                fecha: fecha.clone(),
                categoria: categoria.clone(),
                descripcion: descripcion.clone(),
                proveedor: proveedor.clone(),
                metodo_pago: metodo_pago.clone(),
                banco: banco.clone(),
                monto: *monto,
                num_factura: num_factura.clone(),
                responsable: responsable.clone(),
                ..Default::default()
            };
            ExpensesLogic::add(&store, expense)?;
        }
        ExpenseCmd::Set { id, field, value } => {
            ExpensesLogic::set_field(&store, id, *field, value)?;
            info(format!("{} of expense {} updated.", field.key(), id));
        }
        ExpenseCmd::List { period, by } => {
            let bounds = period_bounds(period)?;
            let expenses = ExpensesLogic::list(&store, bounds)?;
            header(format!("Expenses ({})", describe_period(bounds)));

            if expenses.is_empty() {
                info("No expenses.");
            } else {
                for group in ExpensesLogic::group(&expenses, *by) {
                    println!("{CYAN}▶ {}{RESET}", group.key);

                    let mut table = Table::new(vec![
                        Column::left("ID"),
                        Column::left("DATE"),
                        Column::left("CATEGORY"),
                        Column::left("DESCRIPTION"),
                        Column::left("SUPPLIER"),
                        Column::left("METHOD"),
                        Column::right("AMOUNT"),
                    ]);
                    for (id, e) in &group.expenses {
                        table.add_row(vec![
                            id.clone(),
                            e.fecha.clone().unwrap_or_default(),
                            e.categoria.clone().unwrap_or_default(),
                            truncate(e.descripcion.as_deref().unwrap_or(""), 30),
                            e.proveedor.clone().unwrap_or_default(),
                            e.metodo_pago.clone().unwrap_or_default(),
                            money_with(cur, e.monto),
                        ]);
                    }
                    print!("{}", table.render());
                    println!("  Subtotal: {}\n", money_with(cur, group.total));
                }

                println!(
                    "{}",
                    bold(&format!(
                        "Total: {}",
                        money_with(cur, ExpensesLogic::grand_total(&expenses))
                    ))
                );
            }
        }
        ExpenseCmd::Del { id } => {
            ExpensesLogic::delete(&store, id)?;
        }
    }

    close_store(store);
    Ok(())
}
