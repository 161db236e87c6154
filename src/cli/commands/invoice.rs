use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::InvoiceCmd;
use crate::config::Config;
use crate::core::invoice::{InvoiceLogic, NewInvoice, PRICE_LIST};
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::invoice::{Invoice, Letterhead};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREEN, RESET, YELLOW};
use crate::utils::date;
use crate::utils::formatting::{money_with, truncate};
use crate::utils::table::{Column, Table};
use chrono::Local;

pub fn handle(cmd: &InvoiceCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let cur = &cfg.currency_symbol;

    match cmd {
        InvoiceCmd::Create {
            anombrede,
            direccion,
            personalizado,
            item,
            qty,
            rate,
        } => {
            let input = NewInvoice {
                anombrede: anombrede.clone(),
                direccion: direccion.clone(),
                personalizado: personalizado.clone(),
                item: item.clone(),
                qty: *qty,
                rate: *rate,
            };
            InvoiceLogic::create(&store, &input, Local::now())?;
        }
        InvoiceCmd::FromJob { job, sheet, item } => {
            InvoiceLogic::from_job(&store, sheet.collection(), job, item.as_deref(), Local::now())?;
        }
        InvoiceCmd::Set { key, field, value } => {
            let rec = InvoiceLogic::resolve(&store, key)?;
            let updated = InvoiceLogic::set_field(&store, &rec.id, *field, value, date::today())?;
            let inv: Invoice = updated.to_model()?;
            info(format!(
                "Invoice {}: amount {}, balance due {}.",
                inv.numerodefactura.as_deref().unwrap_or(&rec.id),
                money_with(cur, inv.amount),
                money_with(cur, inv.balance_due())
            ));
        }
        InvoiceCmd::List { status } => {
            let invoices = InvoiceLogic::list(&store, *status)?;
            header("Invoices");

            if invoices.is_empty() {
                info("No invoices.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("NUMBER"),
                    Column::left("ISSUED"),
                    Column::left("BILL TO"),
                    Column::left("ITEM"),
                    Column::right("QTY"),
                    Column::right("RATE"),
                    Column::right("AMOUNT"),
                    Column::left("STATUS"),
                    Column::right("BALANCE"),
                ]);
                for (_, inv) in &invoices {
                    let status = if inv.pago {
                        format!("{GREEN}paid {}{RESET}", inv.fechapago.as_deref().unwrap_or(""))
                    } else {
                        format!("{YELLOW}unpaid{RESET}")
                    };
                    table.add_row(vec![
                        inv.numerodefactura.clone().unwrap_or_default(),
                        inv.fechaemision.clone().unwrap_or_default(),
                        truncate(inv.bill_to(), 30),
                        inv.item.clone().unwrap_or_default(),
                        format!("{}", inv.qty),
                        money_with(cur, inv.rate),
                        money_with(cur, inv.amount),
                        status,
                        money_with(cur, inv.balance_due()),
                    ]);
                }
                print!("{}", table.render());

                let t = InvoiceLogic::totals(&invoices);
                println!(
                    "\n{} invoices, total {}, balance due {}",
                    t.count,
                    money_with(cur, t.amount),
                    money_with(cur, t.balance_due)
                );
            }
        }
        InvoiceCmd::Del { key } => {
            InvoiceLogic::delete(&store, key)?;
        }
        InvoiceCmd::Prices => {
            header("Price list");
            let mut table = Table::new(vec![Column::left("ITEM"), Column::right("RATE")]);
            for (item, rate) in PRICE_LIST {
                table.add_row(vec![item.to_string(), money_with(cur, rate)]);
            }
            print!("{}", table.render());
        }
        InvoiceCmd::Letterhead {
            nombre,
            direccion,
            telefono,
            correo,
            nota,
        } => {
            let changes = Letterhead {
                nombre: nombre.clone(),
                direccion: direccion.clone(),
                telefono: telefono.clone(),
                correo: correo.clone(),
                nota: nota.clone(),
                extra: Default::default(),
            };
            let any_change = changes != Letterhead::default();
            let current = InvoiceLogic::set_letterhead(&store, &changes)?;
            if any_change {
                success("Letterhead updated.");
            }

            header("Letterhead");
            let lines = current.lines();
            if lines.is_empty() {
                info("No letterhead configured.");
            }
            for line in lines {
                println!("  {}", line);
            }
            if let Some(n) = &current.nota {
                println!("  ({})", n);
            }
        }
        InvoiceCmd::Print { keys, file, force } => {
            let mut invoices = Vec::new();
            for key in keys {
                invoices.push(InvoiceLogic::resolve(&store, key)?.to_model::<Invoice>()?);
            }
            let letterhead = InvoiceLogic::letterhead(&store)?;
            ExportLogic::export_invoices(&invoices, &letterhead, cur, file, *force)?;
        }
    }

    close_store(store);
    Ok(())
}
