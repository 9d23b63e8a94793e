use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::io::config_io::{self, ConfigError};
use crate::io::lock::{LockError, StoreLock};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::{ItemRecord, Project, TodoList};

/// Name of the per-project data directory
pub const DATA_DIR: &str = ".ticklist";

/// Error type for store and project I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a ticklist directory: no .ticklist/ found (run `tl init`)")]
    NotAProject,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("could not serialize items: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a directory that contains `.ticklist/`.
pub fn discover_project(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(DATA_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAProject);
        }
    }
}

pub fn load_project(root: &Path) -> Result<Project, StoreError> {
    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(StoreError::NotAProject);
    }
    let config = config_io::read_config(&data_dir)?;
    Ok(Project {
        root: root.to_path_buf(),
        data_dir,
        config,
    })
}

/// A single-key store holding the serialized item list.
pub trait Storage {
    /// The raw stored payload, or `None` when nothing (readable) is stored.
    fn read(&self) -> Option<String>;

    /// Replace the stored payload.
    fn write(&mut self, payload: &str) -> Result<(), StoreError>;

    /// Called with the raw text of stored entries that could not be loaded.
    fn report_dropped(&self, _dropped: &[String]) {}

    /// Called with data another writer produced that is about to be lost:
    /// a stored payload being overwritten, or an edit that no longer applies.
    fn report_conflict(&mut self, _description: &str, _lost: &str) {}
}

/// The store as a JSON file: `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
    key: String,
}

impl FileStorage {
    pub fn new(data_dir: &Path, key: &str) -> Self {
        FileStorage {
            data_dir: data_dir.to_path_buf(),
            key: key.to_string(),
        }
    }

    pub fn for_project(project: &Project) -> Self {
        Self::new(&project.data_dir, &project.config.store.key)
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(self.file_name())
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.key)
    }

    /// Run a read-modify-write cycle on the list while holding the store
    /// lock. Nothing is written if `f` fails.
    pub fn update<T, E>(&self, f: impl FnOnce(&mut TodoList) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _lock =
            StoreLock::acquire_default(&self.data_dir, &self.key).map_err(StoreError::from)?;
        let mut list = load_list(self);
        let out = f(&mut list)?;
        let payload = encode_records(&list.records()).map_err(StoreError::from)?;
        self.write_payload(&payload)?;
        Ok(out)
    }

    /// Atomic write without taking the lock. Failed payloads go to the
    /// recovery log.
    fn write_payload(&self, payload: &str) -> Result<(), StoreError> {
        let path = self.path();
        if let Err(e) = recovery::atomic_write(&path, payload.as_bytes()) {
            recovery::log_recovery(
                &self.data_dir,
                RecoveryEntry::now(RecoveryCategory::Write, "store write failed")
                    .field("Target", self.file_name())
                    .field("Error", e.to_string())
                    .body(payload),
            );
            return Err(StoreError::WriteError { path, source: e });
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Option<String> {
        fs::read_to_string(self.path()).ok()
    }

    fn write(&mut self, payload: &str) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire_default(&self.data_dir, &self.key)?;
        self.write_payload(payload)
    }

    fn report_dropped(&self, dropped: &[String]) {
        recovery::log_recovery(
            &self.data_dir,
            RecoveryEntry::now(RecoveryCategory::Parser, "dropped stored entries")
                .field("Source", self.file_name())
                .body(dropped.join("\n")),
        );
    }

    fn report_conflict(&mut self, description: &str, lost: &str) {
        recovery::log_recovery(
            &self.data_dir,
            RecoveryEntry::now(RecoveryCategory::Conflict, description)
                .field("Target", self.file_name())
                .body(lost),
        );
    }
}

/// In-memory store, used by tests and by anything that wants a scratch list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub value: Option<String>,
    /// Number of successful writes
    pub writes: usize,
    /// Make every write fail
    pub fail_writes: bool,
    /// Everything passed to `report_conflict`, as (description, lost)
    pub conflicts: Vec<(String, String)>,
}

impl MemoryStorage {
    pub fn with_value(value: &str) -> Self {
        MemoryStorage {
            value: Some(value.to_string()),
            ..Default::default()
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, payload: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::IoError(std::io::Error::other(
                "memory store refuses writes",
            )));
        }
        self.value = Some(payload.to_string());
        self.writes += 1;
        Ok(())
    }

    fn report_conflict(&mut self, description: &str, lost: &str) {
        self.conflicts.push((description.to_string(), lost.to_string()));
    }
}

/// A decoded payload: the usable records plus the raw text of anything skipped.
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    pub records: Vec<ItemRecord>,
    pub dropped: Vec<String>,
}

/// Decode a stored payload without ever failing.
///
/// An unparseable or non-array payload decodes to no records (the whole
/// payload is reported as dropped). Array entries must be objects with a
/// non-blank string `text`; `done` reads as `false` unless it is `true`.
pub fn decode_payload(raw: &str) -> Decoded {
    let mut decoded = Decoded::default();
    if raw.trim().is_empty() {
        return decoded;
    }

    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        _ => {
            decoded.dropped.push(raw.to_string());
            return decoded;
        }
    };

    for entry in entries {
        let text = entry
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match text {
            Some(text) => {
                let done = entry.get("done").and_then(Value::as_bool).unwrap_or(false);
                decoded.records.push(ItemRecord::new(text, done));
            }
            None => decoded.dropped.push(entry.to_string()),
        }
    }
    decoded
}

pub fn encode_records(records: &[ItemRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Load the list from storage, degrading to an empty list on bad data.
pub fn load_list(storage: &impl Storage) -> TodoList {
    let Some(raw) = storage.read() else {
        return TodoList::new();
    };
    let decoded = decode_payload(&raw);
    if !decoded.dropped.is_empty() {
        storage.report_dropped(&decoded.dropped);
    }
    TodoList::from_records(decoded.records)
}

/// Write the whole list to storage in one write. Returns the written payload.
pub fn save_list(storage: &mut impl Storage, list: &TodoList) -> Result<String, StoreError> {
    let payload = encode_records(&list.records())?;
    storage.write(&payload)?;
    Ok(payload)
}
