use clap::Args;
use timetable_core::render::render_week;
use timetable_core::{layout_week, ScheduleStore, Weekday};

use crate::context::{CliResult, Context};

#[derive(Args)]
pub struct ShowArgs {
    /// Only this day
    #[arg(long)]
    day: Option<Weekday>,
    /// Include days with nothing scheduled
    #[arg(long)]
    all: bool,
    /// Print positioned items as JSON
    #[arg(long)]
    json: bool,
}

pub fn show(ctx: &Context, args: ShowArgs) -> CliResult {
    let items = ctx.store.load()?;
    let mut week = layout_week(&items);
    if let Some(day) = args.day {
        week.retain(|d| d.day == day);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&week)?);
    } else {
        // A single requested day is always shown, even when empty.
        let include_empty = args.all || args.day.is_some();
        let text = render_week(&week, include_empty);
        if text.is_empty() {
            println!("No schedules.");
        } else {
            print!("{text}");
        }
    }
    Ok(())
}
