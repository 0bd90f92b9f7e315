use std::path::Path;

use now_and_later_core::error::Result;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    config.validate()?;
    let goals = super::load_goals(&config)?;
    tracing::debug!(goals = goals.len(), "goals file validated");
    println!("ok: {} goal(s)", goals.len());
    Ok(())
}
