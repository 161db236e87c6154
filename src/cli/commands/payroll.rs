use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::PayrollCmd;
use crate::config::Config;
use crate::core::employees::EmployeesLogic;
use crate::core::payroll::{PayrollInputs, PayrollLogic, PayrollSheet};
use crate::errors::AppResult;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::colors::{RESET, color_for_balance};
use crate::utils::date;
use crate::utils::formatting::{bold, money_with};
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

fn print_sheet(sheet: &PayrollSheet, names: &HashMap<String, String>, cur: &str) {
    header(format!(
        "Payroll {} ({} to {})",
        sheet.id, sheet.run.fecha_desde, sheet.run.fecha_hasta
    ));

    if sheet.run.registros.is_empty() {
        info("No rows.");
        return;
    }

    let mut table = Table::new(vec![
        Column::left("ROW"),
        Column::left("EMPLOYEE"),
        Column::right("DAYS"),
        Column::right("RATE"),
        Column::right("FORTNIGHT"),
        Column::right("EXTRA"),
        Column::right("DEDUCT."),
        Column::right("PAYROLL"),
        Column::right("CASH"),
        Column::right("TOTAL"),
        Column::right("HANDED"),
        Column::right("BALANCE"),
    ]);

    for (id, row) in sheet.rows() {
        let balance = row.balance();
        table.add_row(vec![
            id.clone(),
            EmployeesLogic::display(names, row.nombre.as_deref()),
            format!("{}", row.dias),
            money_with(cur, row.valor),
            money_with(cur, row.total_quincena),
            money_with(cur, row.extra),
            money_with(cur, row.deducciones),
            money_with(cur, row.total_nomina),
            money_with(cur, row.efectivo),
            money_with(cur, row.total),
            money_with(cur, row.entregado),
            format!("{}{}{}", color_for_balance(balance), money_with(cur, balance), RESET),
        ]);
    }
    print!("{}", table.render());

    let t = sheet.totals();
    println!(
        "\n{}",
        bold(&format!(
            "Payroll {} | Cash {} | Total {} | Handed {} | Balance {}",
            money_with(cur, t.total_nomina),
            money_with(cur, t.efectivo),
            money_with(cur, t.total),
            money_with(cur, t.entregado),
            money_with(cur, t.balance)
        ))
    );
}

pub fn handle(cmd: &PayrollCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let cur = &cfg.currency_symbol;

    match cmd {
        PayrollCmd::Create {
            desde,
            hasta,
            all_employees,
            dias,
            valor,
        } => {
            let mut sheet = PayrollSheet::create(&store, desde, hasta, date::today())?;
            if *all_employees {
                let inputs = PayrollInputs::load(&store)?;
                let n = PayrollLogic::add_all_employees(&store, &mut sheet, &inputs, *dias, *valor)?;
                sheet.persist(&store)?;
                info(format!("{} rows added.", n));
            }
            print_sheet(&sheet, &EmployeesLogic::names(&store)?, cur);
        }
        PayrollCmd::AddRow {
            run,
            employee,
            dias,
            valor,
        } => {
            let mut sheet = PayrollSheet::load(&store, run)?;
            let emp_id = match employee {
                Some(e) => Some(EmployeesLogic::resolve(&store, e)?.id),
                None => None,
            };
            let inputs = PayrollInputs::load(&store)?;
            let row_id = sheet.add_row(store.create_id(), &inputs, emp_id.as_deref(), *dias, *valor)?;
            sheet.persist(&store)?;
            success(format!("Row {} added to {}.", row_id, run));
        }
        PayrollCmd::RemoveRow { run, row } => {
            let mut sheet = PayrollSheet::load(&store, run)?;
            if sheet.remove_row(row)? {
                sheet.persist(&store)?;
                info(format!("Row {} removed from {}.", row, run));
            }
        }
        PayrollCmd::Set {
            run,
            row,
            field,
            value,
        } => {
            let mut sheet = PayrollSheet::load(&store, run)?;
            if sheet.set_amount(row, *field, *value)? {
                sheet.persist(&store)?;
                let r = sheet.row(row)?;
                success(format!(
                    "{} set to {}; total {}.",
                    field.key(),
                    value,
                    money_with(cur, r.total)
                ));
                if field.is_derived() {
                    info(format!(
                        "{} is an override: `payroll refresh` or `payroll assign` will recompute it.",
                        field.key()
                    ));
                }
            }
        }
        PayrollCmd::Assign {
            run,
            row,
            employee,
            yes,
        } => {
            let mut sheet = PayrollSheet::load(&store, run)?;
            let emp = EmployeesLogic::resolve(&store, employee)?;
            let names = EmployeesLogic::names(&store)?;
            let current = sheet.row(row)?.nombre.clone();

            let proceed = match current.as_deref() {
                Some(prev) if prev != emp.id && !*yes => confirm(format!(
                    "Row {} belongs to {}. Reassign it to {} and recompute extras, deductions and cash",
                    row,
                    EmployeesLogic::display(&names, Some(prev)),
                    EmployeesLogic::display(&names, Some(&emp.id)),
                ))?,
                _ => true,
            };

            if !proceed {
                warning("Row left as it was.");
            } else {
                let inputs = PayrollInputs::load(&store)?;
                if sheet.set_employee(&inputs, row, &emp.id)? {
                    sheet.persist(&store)?;
                    let r = sheet.row(row)?;
                    success(format!(
                        "Row {} assigned to {}: extra {}, deductions {}, cash {}.",
                        row,
                        EmployeesLogic::display(&names, Some(&emp.id)),
                        money_with(cur, r.extra),
                        money_with(cur, r.deducciones),
                        money_with(cur, r.efectivo)
                    ));
                }
            }
        }
        PayrollCmd::Refresh { run, keep } => {
            let sheet = PayrollLogic::refresh_run(&store, run, keep)?;
            print_sheet(&sheet, &EmployeesLogic::names(&store)?, cur);
        }
        PayrollCmd::Show { run } => {
            let sheet = PayrollSheet::load(&store, run)?;
            print_sheet(&sheet, &EmployeesLogic::names(&store)?, cur);
        }
        PayrollCmd::List => {
            let runs = PayrollLogic::list(&store)?;
            header("Payroll runs");
            if runs.is_empty() {
                info("No payroll runs.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("RUN"),
                    Column::left("FROM"),
                    Column::left("TO"),
                    Column::left("CREATED"),
                    Column::right("ROWS"),
                ]);
                for (id, r) in &runs {
                    table.add_row(vec![
                        id.clone(),
                        r.fecha_desde.clone(),
                        r.fecha_hasta.clone(),
                        r.fecha_creacion.clone(),
                        r.registros.len().to_string(),
                    ]);
                }
                print!("{}", table.render());
            }
        }
        PayrollCmd::Del { run } => {
            PayrollLogic::delete(&store, run)?;
        }
    }

    close_store(store);
    Ok(())
}
