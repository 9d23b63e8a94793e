use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration from `.ticklist/config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub labels: LabelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store key; items live in `<key>.json`
    #[serde(default = "default_store_key")]
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            key: default_store_key(),
        }
    }
}

fn default_store_key() -> String {
    "todos".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// How long a single click on a label waits for a second click before
    /// it toggles. Also the window in which two clicks count as a double click.
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            click_delay_ms: default_click_delay_ms(),
        }
    }
}

fn default_click_delay_ms() -> u64 {
    200
}

impl InputConfig {
    pub fn click_delay(&self) -> Duration {
        Duration::from_millis(self.click_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides, keyed by theme slot (e.g. `background = "#000000"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Display names of the three filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_all_label")]
    pub all: String,
    #[serde(default = "default_active_label")]
    pub active: String,
    #[serde(default = "default_completed_label")]
    pub completed: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            all: default_all_label(),
            active: default_active_label(),
            completed: default_completed_label(),
        }
    }
}

fn default_all_label() -> String {
    "All".to_string()
}

fn default_active_label() -> String {
    "Active".to_string()
}

fn default_completed_label() -> String {
    "Completed".to_string()
}
