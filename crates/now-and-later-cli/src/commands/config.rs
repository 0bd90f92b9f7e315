use std::path::Path;

use clap::Subcommand;
use now_and_later_core::error::Result;
use now_and_later_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the goals file location
    Path,
    /// Print the goals file as TOML, creating it with defaults if missing
    Show,
}

pub fn run(config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => Config::path()?,
            };
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = super::load_config(config_path)?;
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
