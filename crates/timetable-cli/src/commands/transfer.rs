use std::path::Path;

use timetable_core::transfer::{export_json, import_from_path};
use timetable_core::{ScheduleStore, UuidIds};

use crate::context::{CliResult, Context};

pub fn export(ctx: &Context, out: &Path) -> CliResult {
    let items = ctx.store.load()?;
    let document = export_json(&items)?;
    if out == Path::new("-") {
        println!("{document}");
    } else {
        std::fs::write(out, document)?;
        println!("Exported {} items to {}", items.len(), out.display());
    }
    Ok(())
}

pub fn import(ctx: &Context, path: &Path) -> CliResult {
    let items = ctx.store.load()?;
    let outcome = import_from_path(&items, path, &mut UuidIds)?;
    ctx.store.save(&outcome.items)?;

    println!("Imported {} items (merged)", outcome.imported);
    for moved in &outcome.shifted {
        println!("  moved {} on {} from {} to {}", moved.id, moved.day, moved.from, moved.to);
    }
    Ok(())
}
