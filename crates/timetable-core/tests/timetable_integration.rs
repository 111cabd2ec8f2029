//! End-to-end flows over the core: entry, import, storage and layout.

use timetable_core::transfer::{export_json, import_json};
use timetable_core::{
    add_item, layout_week, CoreError, ItemDraft, JsonFileStore, MemoryStore, MinuteOfDay,
    ScheduleStore, SequentialIds, Weekday,
};

fn at(h: u16, m: u16) -> MinuteOfDay {
    MinuteOfDay::from_hm(h, m).unwrap()
}

#[test]
fn same_minute_add_is_rejected_but_overlap_is_not() {
    let mut ids = SequentialIds::new("id");
    let items = add_item(&[], ItemDraft::new("Calculus", Weekday::Monday, at(9, 0)), &mut ids).unwrap();

    let clash = add_item(&items, ItemDraft::new("Physics", Weekday::Monday, at(9, 0)), &mut ids);
    assert!(matches!(clash, Err(CoreError::Collision { .. })));

    let items = add_item(
        &items,
        ItemDraft::new("Physics", Weekday::Monday, at(9, 30)).with_duration(30),
        &mut ids,
    )
    .unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn imported_duplicate_start_moves_one_minute() {
    let text = r#"[
        {"subject":"A","day":"Monday","time":"09:00","duration":60},
        {"subject":"B","day":"Monday","time":"09:00","duration":30}
    ]"#;
    let outcome = import_json(&[], text, &mut SequentialIds::new("imp")).unwrap();
    assert_eq!(outcome.items[1].day, Weekday::Monday);
    assert_eq!(outcome.items[1].time, at(9, 1));
}

#[test]
fn overlapping_monday_items_get_half_width_columns() {
    let mut ids = SequentialIds::new("id");
    let items = add_item(&[], ItemDraft::new("A", Weekday::Monday, at(9, 0)), &mut ids).unwrap();
    let items = add_item(&items, ItemDraft::new("B", Weekday::Monday, at(9, 30)), &mut ids).unwrap();
    let items = add_item(&items, ItemDraft::new("C", Weekday::Tuesday, at(10, 0)), &mut ids).unwrap();

    let week = layout_week(&items);
    let monday = &week[Weekday::Monday.index()];
    assert_eq!(monday.items.len(), 2);
    assert_eq!((monday.items[0].col, monday.items[0].total_cols), (0, 2));
    assert_eq!((monday.items[1].col, monday.items[1].total_cols), (1, 2));
    assert_eq!(monday.items[0].width_percent(), 50.0);

    let tuesday = &week[Weekday::Tuesday.index()];
    assert_eq!((tuesday.items[0].col, tuesday.items[0].total_cols), (0, 1));
    assert_eq!(tuesday.items[0].width_percent(), 100.0);
}

#[test]
fn malformed_import_leaves_the_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::at(dir.path().join("schedules.json"));
    let mut ids = SequentialIds::new("id");
    let items = add_item(&[], ItemDraft::new("Keep me", Weekday::Friday, at(12, 0)), &mut ids).unwrap();
    store.save(&items).unwrap();

    let current = store.load().unwrap();
    let result = import_json(&current, "[{\"day\":\"Friday\"", &mut ids);
    assert!(result.is_err());

    assert_eq!(store.load().unwrap(), items);
}

#[test]
fn export_import_between_stores() {
    let source = MemoryStore::default();
    let mut ids = SequentialIds::new("src");
    let items = add_item(&[], ItemDraft::new("Exam prep", Weekday::Sunday, at(18, 0)), &mut ids).unwrap();
    source.save(&items).unwrap();

    let document = export_json(&source.load().unwrap()).unwrap();

    let target = MemoryStore::new(items.clone());
    let outcome = import_json(&target.load().unwrap(), &document, &mut SequentialIds::new("dst")).unwrap();
    target.save(&outcome.items).unwrap();

    let merged = target.load().unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[1].time, at(18, 1));
    assert_eq!(merged[1].id, "dst-1");
    assert_eq!(outcome.shifted.len(), 1);
}
