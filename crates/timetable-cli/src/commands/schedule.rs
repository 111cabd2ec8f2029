use clap::Args;
use timetable_core::render::render_list;
use timetable_core::{
    add_item, remove_item, replace_item, ItemDraft, ItemKind, MinuteOfDay, ScheduleStore,
    UuidIds, Weekday,
};

use crate::context::{CliResult, Context};

/// Fields of one item. Anything left out falls back to `[entry]` in config.
#[derive(Args)]
pub struct ItemArgs {
    /// Subject name
    #[arg(long, default_value = "")]
    subject: String,
    /// Instructor name
    #[arg(long, default_value = "")]
    instructor: String,
    /// Room or location
    #[arg(long, default_value = "")]
    room: String,
    /// Lecture, Section or Exam
    #[arg(long)]
    kind: Option<ItemKind>,
    /// Day of the week (e.g. "Monday" or "mon")
    #[arg(long)]
    day: Option<Weekday>,
    /// Start time, HH:MM
    #[arg(long)]
    time: Option<MinuteOfDay>,
    /// Duration in minutes
    #[arg(long)]
    duration: Option<u32>,
    /// Reminder lead time in minutes
    #[arg(long)]
    reminder: Option<u32>,
}

impl ItemArgs {
    fn into_draft(self, ctx: &Context) -> ItemDraft {
        let entry = &ctx.config.entry;
        let mut draft = ItemDraft::new(
            self.subject,
            self.day.unwrap_or(entry.default_day),
            self.time.unwrap_or(entry.default_time),
        )
        .with_kind(self.kind.unwrap_or(entry.default_kind))
        .with_duration(self.duration.unwrap_or(entry.default_duration))
        .with_room(self.room)
        .with_instructor(self.instructor);
        draft.reminder = self.reminder.unwrap_or(entry.default_reminder);
        draft
    }
}

pub fn add(ctx: &Context, args: ItemArgs) -> CliResult {
    let items = ctx.store.load()?;
    let draft = args.into_draft(ctx);
    let updated = add_item(&items, draft, &mut UuidIds)?;
    ctx.store.save(&updated)?;
    if let Some(item) = updated.last() {
        println!("Added: {} {} {} [{}]", item.subject, item.day, item.time, item.id);
    }
    Ok(())
}

pub fn list(ctx: &Context, day: Option<Weekday>, json: bool) -> CliResult {
    let items: Vec<_> = ctx
        .store
        .load()?
        .into_iter()
        .filter(|item| day.map_or(true, |d| item.day == d))
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No schedules.");
    } else {
        print!("{}", render_list(&items));
    }
    Ok(())
}

pub fn remove(ctx: &Context, id: &str) -> CliResult {
    let items = ctx.store.load()?;
    let updated = remove_item(&items, id)?;
    ctx.store.save(&updated)?;
    println!("Removed: {id}");
    Ok(())
}

pub fn replace(ctx: &Context, id: &str, args: ItemArgs) -> CliResult {
    let items = ctx.store.load()?;
    let draft = args.into_draft(ctx);
    let updated = replace_item(&items, id, draft)?;
    ctx.store.save(&updated)?;
    println!("Updated: {id}");
    Ok(())
}
