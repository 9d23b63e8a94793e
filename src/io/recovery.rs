use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Once the log grows past this size (256 KB), the oldest entries are dropped.
const MAX_LOG_SIZE: u64 = 262_144;

/// Entries kept when the log is trimmed.
const KEEP_ON_TRIM: usize = 50;

const FILE_HEADER: &str = "\
<!-- ticklist recovery log
     Data that could not be saved or loaded normally ends up here.
     View with: tl recovery
     Safe to delete. -->

---
";

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Stored entries that could not be read back
    Parser,
    /// A store write that failed
    Write,
    /// Changes by another process that a write replaced or could not keep
    Conflict,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Conflict => write!(f, "conflict"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            "conflict" => Some(RecoveryCategory::Conflict),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn now(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry to the recovery log. Failures only produce a warning on stderr.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(data_dir, &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn append_entry(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        trim_log(&path)?;
    }

    let needs_header = fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

/// Keep only the newest `KEEP_ON_TRIM` entries.
fn trim_log(path: &Path) -> io::Result<()> {
    let content = fs::read_to_string(path)?;
    let blocks = entry_blocks(&content);
    let skip = blocks.len().saturating_sub(KEEP_ON_TRIM);
    let mut trimmed = FILE_HEADER.to_string();
    for block in &blocks[skip..] {
        trimmed.push_str(block);
    }
    atomic_write(path, trimmed.as_bytes())
}

/// Split log content into raw entry blocks (each starting at `## `).
fn entry_blocks(content: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = content
        .match_indices("\n## ")
        .map(|(i, _)| i + 1)
        .collect();
    if content.starts_with("## ") {
        starts.insert(0, 0);
    }
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(content.len());
            &content[start..end]
        })
        .collect()
}

/// Read the entries of the recovery log, most recent first.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries: Vec<RecoveryEntry> = entry_blocks(&content)
        .into_iter()
        .filter_map(parse_block)
        .collect();
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

fn parse_block(block: &str) -> Option<RecoveryEntry> {
    let mut lines = block.lines();
    let header = lines.next()?.strip_prefix("## ")?;
    let (timestamp, rest) = header.split_once(' ')?;
    let (category, description) = rest.split_once(": ")?;
    let mut entry = RecoveryEntry {
        timestamp: DateTime::parse_from_rfc3339(timestamp)
            .ok()?
            .with_timezone(&Utc),
        category: RecoveryCategory::parse_category(category)?,
        description: description.to_string(),
        fields: Vec::new(),
        body: String::new(),
    };

    let mut in_body = false;
    for line in lines {
        if in_body {
            if line == "```" {
                in_body = false;
            } else {
                if !entry.body.is_empty() {
                    entry.body.push('\n');
                }
                entry.body.push_str(line);
            }
        } else if line.starts_with("```") {
            in_body = true;
        } else if line == "---" {
            break;
        } else if let Some((key, value)) = line.split_once(": ") {
            entry.fields.push((key.to_string(), value.to_string()));
        }
    }
    Some(entry)
}
