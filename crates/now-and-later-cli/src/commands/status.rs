use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Args;
use now_and_later_core::error::Result;
use now_and_later_core::{format_duration, Goal, GoalSnapshot};

#[derive(Args)]
pub struct StatusArgs {
    /// Print goal snapshots as JSON
    #[arg(long)]
    json: bool,
}

fn fmt_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn status_line(goal: &Goal) -> String {
    format!(
        "{}: {} (priority {}) every {}, next {}, preempt {}, snooze {}",
        goal.name(),
        goal.state(),
        goal.priority(),
        format_duration(goal.action_duration()),
        fmt_time(goal.next_main_action()),
        fmt_time(goal.next_preempt_action()),
        fmt_time(goal.next_snooze_action()),
    )
}

pub fn run(config_path: Option<&Path>, args: StatusArgs) -> Result<()> {
    let config = super::load_config(config_path)?;
    let goals = super::load_goals(&config)?;

    if args.json {
        let snapshots: Vec<GoalSnapshot> = goals.iter().map(|g| g.snapshot()).collect();
        println!("{}", serde_json::to_string_pretty(&snapshots).map_err(io::Error::from)?);
        return Ok(());
    }

    if goals.is_empty() {
        println!("no goals configured");
    }
    for goal in &goals {
        println!("{}", status_line(goal));
    }
    Ok(())
}
