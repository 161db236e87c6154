use crate::cli::commands::{close_store, open_store};
use crate::cli::parser::UserCmd;
use crate::config::Config;
use crate::core::employees::EmployeesLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &UserCmd, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    match cmd {
        UserCmd::Add { name, role } => {
            EmployeesLogic::add(&store, name, role.as_deref())?;
        }
        UserCmd::List { all } => {
            let employees = EmployeesLogic::list(&store, *all)?;
            header("Employees");
            if employees.is_empty() {
                info("No employees.");
            } else {
                let mut table = Table::new(vec![
                    Column::left("ID"),
                    Column::left("NAME"),
                    Column::left("ROLE"),
                    Column::left("STATUS"),
                ]);
                for (id, e) in &employees {
                    table.add_row(vec![
                        id.clone(),
                        e.display_name().to_string(),
                        e.role.clone().unwrap_or_default(),
                        if e.active {
                            "active".into()
                        } else {
                            format!("{GREY}inactive{RESET}")
                        },
                    ]);
                }
                print!("{}", table.render());
            }
        }
        UserCmd::Rename { key, name } => {
            EmployeesLogic::rename(&store, key, name)?;
            success(format!("Employee renamed to '{}'.", name.trim()));
        }
        UserCmd::Role { key, role } => {
            EmployeesLogic::set_role(&store, key, role)?;
            success(format!("Role set to '{}'.", role.trim()));
        }
        UserCmd::Activate { key } => {
            EmployeesLogic::set_active(&store, key, true)?;
        }
        UserCmd::Deactivate { key } => {
            EmployeesLogic::set_active(&store, key, false)?;
        }
        UserCmd::Del { key } => {
            EmployeesLogic::delete(&store, key)?;
        }
    }

    close_store(store);
    Ok(())
}
