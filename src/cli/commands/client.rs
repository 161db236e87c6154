use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::ClientCmd;
use crate::config::Config;
use crate::core::clients::{ClientsLogic, NewClient};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::formatting::{money_with, opt_number};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &ClientCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    match cmd {
        ClientCmd::Add {
            direccion,
            anombrede,
            cubicos,
            valor,
            email,
        } => {
            ClientsLogic::add(
                &store,
                &NewClient {
                    direccion: direccion.clone(),
                    anombrede: anombrede.clone(),
                    cubicos: *cubicos,
                    valor: *valor,
                    email: email.clone(),
                },
            )?;
        }
        ClientCmd::Set { id, field, value } => {
            ClientsLogic::set_field(&store, id, *field, value)?;
            info(format!("{} of client {} updated.", field.key(), id));
        }
        ClientCmd::List { search } => {
            let clients = ClientsLogic::list(&store, search.as_deref())?;
            header("Clients");

            if clients.is_empty() {
                info("No clients.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("ID"),
                    Column::left("ADDRESS"),
                    Column::left("NAME"),
                    Column::right("M3"),
                    Column::right("VALUE"),
                    Column::left("EMAIL"),
                ]);
                for (id, c) in &clients {
                    table.add_row(vec![
                        id.clone(),
                        c.direccion.clone().unwrap_or_default(),
                        c.anombrede.clone().unwrap_or_default(),
                        opt_number(c.cubicos),
                        c.valor
                            .map(|v| money_with(&cfg.currency_symbol, v))
                            .unwrap_or_default(),
                        c.email.clone().unwrap_or_default(),
                    ]);
                }
                print!("{}", table.render());
                println!("\n{} clients", clients.len());
            }
        }
        ClientCmd::Del { id } => {
            ClientsLogic::delete(&store, id)?;
        }
    }

    close_store(store);
    Ok(())
}
