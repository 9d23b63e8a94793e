use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::{Filter, TodoList};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    /// 1-based position in the full list
    pub position: usize,
    pub text: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct ListJson {
    pub filter: Filter,
    /// Canonical route fragment for `filter`, as accepted by `--route`
    pub route: &'static str,
    pub active: usize,
    pub completed: usize,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Items matching `filter`, numbered by their position in the full list
pub fn items_to_json(list: &TodoList, filter: Filter) -> Vec<ItemJson> {
    list.iter()
        .enumerate()
        .filter(|(_, item)| filter.matches(item.done))
        .map(|(i, item)| ItemJson {
            position: i + 1,
            text: item.text.clone(),
            done: item.done,
        })
        .collect()
}

pub fn recovery_entry_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per item: ` 2  [x] Walk dog`
pub fn format_item_lines(items: &[ItemJson]) -> Vec<String> {
    let width = items
        .iter()
        .map(|item| item.position.to_string().len())
        .max()
        .unwrap_or(1);
    items
        .iter()
        .map(|item| {
            format!(
                "{:>width$}  [{}] {}",
                item.position,
                if item.done { 'x' } else { ' ' },
                item.text,
            )
        })
        .collect()
}

/// Footer line under a listing: `2 active, 1 completed`
pub fn format_counts(active: usize, completed: usize) -> String {
    format!("{active} active, {completed} completed")
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> String {
    let mut out = format!(
        "{} {}: {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.description
    );
    for (key, value) in &entry.fields {
        out.push_str(&format!("\n  {key}: {value}"));
    }
    if !entry.body.is_empty() {
        for line in entry.body.lines() {
            out.push_str(&format!("\n    {line}"));
        }
    }
    out
}
