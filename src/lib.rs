//! rServiceOps library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (store, history tracker, business logic, export).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use core::adjustments::AdjustmentKind;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Job(cmd) => commands::job::handle(cmd, cfg),
        Commands::Client(cmd) => commands::client::handle(cmd, cfg),
        Commands::User(cmd) => commands::user::handle(cmd, cfg),
        Commands::Invoice(cmd) => commands::invoice::handle(cmd, cfg),
        Commands::Expense(cmd) => commands::expense::handle(cmd, cfg),
        Commands::Extra(cmd) => commands::adjustment::handle(AdjustmentKind::Extra, cmd, cfg),
        Commands::Deduction(cmd) => {
            commands::adjustment::handle(AdjustmentKind::Deduction, cmd, cfg)
        }
        Commands::Cash(cmd) => commands::cash::handle(cmd, cfg),
        Commands::Payroll(cmd) => commands::payroll::handle(cmd, cfg),
        Commands::Day(cmd) => commands::day::handle(cmd, cfg),
        Commands::Report(cmd) => commands::report::handle(cmd, cfg),
        Commands::History(cmd) => commands::history::handle(cmd, cfg),
        Commands::Export(args) => commands::export::handle(args, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; command-line flags override it
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(user) = &cli.user {
        cfg.user = user.clone();
    }
    if cli.no_history {
        cfg.history.enabled = false;
    }

    dispatch(&cli, &cfg)
}
