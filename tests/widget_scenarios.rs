//! End-to-end widget scenarios against a real file store.
//!
//! Each test drives a `TodoWidget` through clicks, keys and timer ticks the
//! way the TUI would, then checks the JSON that landed on disk.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use ticklist::io::recovery::RecoveryCategory;
use ticklist::io::store::{FileStorage, Storage};
use ticklist::model::{Config, Filter, ItemId};
use ticklist::widget::{Focus, Key, Target, TodoWidget};

const DELAY: Duration = Duration::from_millis(200);

fn widget_in(data_dir: &Path) -> TodoWidget<FileStorage> {
    TodoWidget::new(FileStorage::new(data_dir, "todos"), &Config::default())
}

fn on_disk(data_dir: &Path) -> String {
    fs::read_to_string(data_dir.join("todos.json")).unwrap()
}

fn type_text(w: &mut TodoWidget<FileStorage>, s: &str) {
    for c in s.chars() {
        w.key(c.into());
    }
}

fn first_id(w: &TodoWidget<FileStorage>) -> ItemId {
    w.list().at(0).unwrap().id
}

#[test]
fn add_toggle_edit_delete() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut w = widget_in(tmp.path());
    let t0 = Instant::now();

    type_text(&mut w, "Buy milk");
    w.key(Key::Enter.into());
    assert_eq!(w.visible_ids().len(), 1);
    assert_eq!(on_disk(tmp.path()), r#"[{"text":"Buy milk","done":false}]"#);

    // Single click on the label toggles once the delay has passed
    let id = first_id(&w);
    w.click(Target::Label(id), 1, t0);
    assert_eq!(w.tick(t0 + DELAY / 2), 0);
    assert_eq!(w.tick(t0 + DELAY), 1);
    assert_eq!(on_disk(tmp.path()), r#"[{"text":"Buy milk","done":true}]"#);

    // Double click opens the editor instead of toggling
    let t1 = t0 + Duration::from_secs(1);
    w.click(Target::Label(id), 1, t1);
    w.click(Target::Label(id), 2, t1 + Duration::from_millis(50));
    w.double_click(Target::Label(id));
    assert_eq!(w.editing(), Some(id));
    assert!(!w.is_pending(id));

    w.key(Key::End.into());
    for _ in 0.."milk".len() {
        w.key(Key::Backspace.into());
    }
    type_text(&mut w, "oat milk");
    w.key(Key::Enter.into());
    assert_eq!(w.editing(), None);
    assert_eq!(w.tick(t1 + DELAY * 2), 0);
    assert_eq!(on_disk(tmp.path()), r#"[{"text":"Buy oat milk","done":true}]"#);

    w.click(Target::Remove(id), 1, t1 + Duration::from_secs(1));
    assert!(w.list().is_empty());
    assert_eq!(on_disk(tmp.path()), "[]");
    assert_eq!(w.focus(), Focus::Input);
}

#[test]
fn escape_keeps_stored_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"[{"text":"Walk dog","done":false}]"#,
    )
    .unwrap();
    let mut w = widget_in(tmp.path());
    let id = first_id(&w);

    w.double_click(Target::Label(id));
    type_text(&mut w, "Feed cat");
    w.key(Key::Escape.into());

    assert_eq!(w.list().get(id).unwrap().text, "Walk dog");
    assert_eq!(on_disk(tmp.path()), r#"[{"text":"Walk dog","done":false}]"#);
}

#[test]
fn blank_edit_reverts() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"[{"text":"Walk dog","done":false}]"#,
    )
    .unwrap();
    let mut w = widget_in(tmp.path());
    let id = first_id(&w);

    w.double_click(Target::Label(id));
    // The whole text starts selected, so one backspace clears it
    w.key(Key::Backspace.into());
    type_text(&mut w, "   ");
    w.key(Key::Enter.into());

    assert_eq!(w.list().get(id).unwrap().text, "Walk dog");
    assert_eq!(on_disk(tmp.path()), r#"[{"text":"Walk dog","done":false}]"#);
}

#[test]
fn filtered_view_follows_toggles() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"[{"text":"a","done":false},{"text":"b","done":true}]"#,
    )
    .unwrap();
    let mut w = widget_in(tmp.path());
    w.set_route("#/active");
    assert_eq!(w.filter(), Filter::Active);
    assert_eq!(w.announcement(), "Active: 1 task");

    let a = first_id(&w);
    w.click(Target::Row(a), 1, Instant::now());
    assert!(w.visible_ids().is_empty());
    assert_eq!(w.focus(), Focus::Input);
    assert_eq!(
        on_disk(tmp.path()),
        r#"[{"text":"a","done":true},{"text":"b","done":true}]"#
    );
}

#[test]
fn external_write_is_picked_up() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut w = widget_in(tmp.path());
    type_text(&mut w, "first");
    w.key(Key::Enter.into());

    // Our own write is not a change
    assert!(!w.external_change());

    let mut other = FileStorage::new(tmp.path(), "todos");
    other
        .write(r#"[{"text":"first","done":false},{"text":"second","done":false}]"#)
        .unwrap();
    assert!(w.external_change());
    assert_eq!(w.list().len(), 2);
}

#[test]
fn malformed_store_starts_empty_and_is_logged() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todos.json"), "not json").unwrap();

    let w = widget_in(tmp.path());
    assert!(w.list().is_empty());

    let entries = ticklist::io::recovery::read_recovery_entries(tmp.path(), None);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].body, "not json");
}

#[test]
fn edit_commit_keeps_a_concurrent_cli_add() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todos.json"), r#"[{"text":"a","done":false}]"#).unwrap();
    let mut w = widget_in(tmp.path());
    let id = first_id(&w);

    w.double_click(Target::Label(id));
    let mut cli = FileStorage::new(tmp.path(), "todos");
    cli.write(r#"[{"text":"a","done":false},{"text":"from cli","done":false}]"#)
        .unwrap();
    assert!(!w.external_change());

    type_text(&mut w, "b");
    w.key(Key::Enter.into());

    assert_eq!(
        on_disk(tmp.path()),
        r#"[{"text":"b","done":false},{"text":"from cli","done":false}]"#
    );
    assert!(ticklist::io::recovery::read_recovery_entries(tmp.path(), None).is_empty());
}

#[test]
fn overwritten_store_goes_to_recovery_log() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todos.json"), r#"[{"text":"a","done":false}]"#).unwrap();
    let mut w = widget_in(tmp.path());
    let id = first_id(&w);

    // Written before the watcher reported it
    let unseen = r#"[{"text":"a","done":false},{"text":"from cli","done":false}]"#;
    FileStorage::new(tmp.path(), "todos").write(unseen).unwrap();
    w.click(Target::Row(id), 1, Instant::now());

    assert_eq!(on_disk(tmp.path()), r#"[{"text":"a","done":true}]"#);
    let entries = ticklist::io::recovery::read_recovery_entries(tmp.path(), None);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, RecoveryCategory::Conflict);
    assert_eq!(entries[0].body, unseen);
}
