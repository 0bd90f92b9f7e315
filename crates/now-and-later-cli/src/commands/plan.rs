use std::io;
use std::path::Path;

use chrono::Utc;
use clap::Args;
use now_and_later_core::error::Result;
use now_and_later_core::{parse_duration, Scheduler};

#[derive(Args)]
pub struct PlanArgs {
    /// How far ahead to plan (e.g. "2 weeks"); defaults to [plan].horizon
    #[arg(long)]
    horizon: Option<String>,
    /// Spacing between plan slots (e.g. "12h"); defaults to [plan].step
    #[arg(long)]
    step: Option<String>,
    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(config_path: Option<&Path>, args: PlanArgs) -> Result<()> {
    let config = super::load_config(config_path)?;
    let horizon = match &args.horizon {
        Some(h) => parse_duration(h)?,
        None => config.plan.horizon()?,
    };
    let step = match &args.step {
        Some(s) => parse_duration(s)?,
        None => config.plan.step()?,
    };

    let mut scheduler = Scheduler::new();
    scheduler.add_goals(super::load_goals(&config)?);
    let plan = scheduler.plan(Utc::now(), horizon, step)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan).map_err(io::Error::from)?);
    } else {
        for slot in &plan {
            print!("{slot}");
        }
    }
    Ok(())
}
