use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();
        let path = path.to_string_lossy();

        if *print_config {
            println!("📄 Current configuration:\n");
            if std::path::Path::new(path.as_ref()).exists() {
                ConfigLogic::print(&path)?;
            } else {
                // defaults with command-line overrides applied
                println!("{}", cfg.to_yaml()?);
            }
        }

        if *check || *migrate {
            ConfigLogic::check(&path, *migrate)?;
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
        }
    }

    Ok(())
}
