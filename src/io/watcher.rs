use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the store watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// The store file was created, modified or removed by someone.
    Changed,
}

/// Watches a single store file for changes made by other processes.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    /// Watch `store_path`. The parent directory is watched (non-recursively)
    /// so atomic renames onto the file are seen too.
    pub fn start(store_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target = store_path.to_path_buf();
        let dir = store_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else { return };
                if is_store_change(&event, &target) {
                    let _ = tx.send(StoreEvent::Changed);
                }
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending notifications. Returns true if the store changed.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(StoreEvent::Changed) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

fn is_store_change(event: &Event, target: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p.file_name() == target.file_name())
}
