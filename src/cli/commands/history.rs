use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::HistoryCmd;
use crate::config::Config;
use crate::core::history::{HistoryFilter, filter_entries};
use crate::errors::AppResult;
use crate::store::Collection;
use crate::ui::messages::{header, info};
use crate::utils::formatting::truncate;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &HistoryCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    match cmd {
        HistoryCmd::List {
            lugar,
            record_id,
            action,
            limit,
        } => {
            let filter = HistoryFilter {
                lugar: lugar.as_deref().map(Collection::parse).transpose()?,
                record_id: record_id.clone(),
                action: *action,
                limit: (*limit > 0).then_some(*limit),
            };
            let entries = filter_entries(&store.snapshot(Collection::History)?, &filter);

            header("Change history");
            if entries.is_empty() {
                info("No changes recorded.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("DATE"),
                    Column::left("TIME"),
                    Column::left("USER"),
                    Column::left("WHERE"),
                    Column::left("RECORD"),
                    Column::left("CHANGE"),
                ]);
                for e in &entries {
                    table.add_row(vec![
                        e.fecha.clone(),
                        e.hora.clone(),
                        e.usuario.clone(),
                        e.lugar.clone(),
                        e.record_id.clone(),
                        truncate(&e.cambio, 90),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    close_store(store);
    Ok(())
}
