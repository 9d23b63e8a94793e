use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Filter;

/// Persisted TUI state (written to `.state.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Last active filter
    #[serde(default)]
    pub filter: Filter,
    /// Display index of the focused row, if a row had focus
    #[serde(default)]
    pub cursor: Option<usize>,
}

pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(data_dir.join(".state.json")).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(data_dir.join(".state.json"), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            filter: Filter::Completed,
            cursor: Some(3),
        };
        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded.filter, Filter::Completed);
        assert_eq!(loaded.cursor, Some(3));
    }

    #[test]
    fn missing_or_malformed_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.filter, Filter::All);
        assert!(state.cursor.is_none());
    }

    #[test]
    fn filter_serializes_lowercase() {
        let json = serde_json::to_string(&UiState {
            filter: Filter::Active,
            cursor: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"filter":"active","cursor":null}"#);
    }
}
