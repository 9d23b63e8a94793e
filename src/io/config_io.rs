use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE: &str = "config.toml";

/// Written by `tl init`
pub const DEFAULT_CONFIG: &str = r#"[store]
key = "todos"

[input]
# A single click on a task waits this long for a second click
# before toggling it. Two clicks inside the window open the editor.
click_delay_ms = 200

[ui]
show_key_hints = true

[labels]
all = "All"
active = "Active"
completed = "Completed"
"#;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Read `config.toml`; a missing file yields the defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Read the config as an editable document (comments and layout preserved).
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?
    } else {
        String::new()
    };
    Ok(text.parse()?)
}

pub fn write_config_doc(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    fs::write(&path, doc.to_string()).map_err(|source| ConfigError::WriteError { path, source })
}

/// Set a dotted key like `input.click_delay_ms` in the document, checking
/// the value against the key's type.
pub fn set_config_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let item = match (section, field) {
        ("input", "click_delay_ms") => {
            let ms: i64 = value
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| invalid(key, value, "a positive number of milliseconds"))?;
            toml_edit::value(ms)
        }
        ("ui", "show_key_hints") => {
            let flag: bool = value
                .parse()
                .map_err(|_| invalid(key, value, "true or false"))?;
            toml_edit::value(flag)
        }
        ("store", "key") => {
            let valid = !value.is_empty()
                && value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(invalid(key, value, "letters, digits, '-' or '_'"));
            }
            toml_edit::value(value)
        }
        ("labels", "all" | "active" | "completed") => {
            if value.trim().is_empty() {
                return Err(invalid(key, value, "a non-empty label"));
            }
            toml_edit::value(value)
        }
        ("ui", field) if field.starts_with("colors.") => {
            return Err(ConfigError::UnknownKey(format!(
                "{} (edit [ui.colors] in config.toml directly)",
                key
            )));
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    };

    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[section][field] = item;
    Ok(())
}

fn invalid(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}
