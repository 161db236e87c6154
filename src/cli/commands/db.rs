use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::queries::set_counter as write_counter;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::store::INVOICE_COUNTER;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
        set_counter,
    } = cmd
    {
        if !(*migrate || *check || *vacuum || *info || set_counter.is_some()) {
            return Ok(());
        }

        let mut pool = DbPool::new(&cfg.database)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            let pending = pending_migrations(&pool.conn)?;
            println!("{}▶ Running migrations… ({} pending){}", CYAN, pending.len(), RESET);
            run_pending_migrations(&pool.conn)?;
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&mut pool, &cfg.database)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            ttlog(&pool.conn, "vacuum", &cfg.database, "Database vacuumed")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }

        //
        // 5) INVOICE COUNTER
        //
        if let Some(n) = set_counter {
            if *n < 0 {
                return Err(AppError::InvalidField(
                    INVOICE_COUNTER.into(),
                    "must not be negative".into(),
                ));
            }
            run_pending_migrations(&pool.conn)?;
            write_counter(&pool.conn, INVOICE_COUNTER, *n)?;
            ttlog(
                &pool.conn,
                "counter_set",
                INVOICE_COUNTER,
                &format!("Invoice counter set to {}", n),
            )?;
            println!(
                "{}✔ Invoice counter set to {}; the next invoice takes {}.{}",
                GREEN,
                n,
                n + 1,
                RESET
            );
        }
    }

    Ok(())
}
