use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::InitArgs;
use crate::io::config_io::{CONFIG_FILE, DEFAULT_CONFIG};
use crate::io::store::{self, DATA_DIR};

/// Create `.ticklist/` under `root` with the default config.
///
/// An existing data directory is an error unless `force` is set, in which
/// case only `config.toml` is rewritten; stored tasks are left alone.
fn init_in(root: &Path, force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let data_dir = root.join(DATA_DIR);

    if data_dir.is_dir() && !force {
        return Err(format!("ticklist already initialized in ./{}/ (use --force to reset config)", DATA_DIR).into());
    }

    fs::create_dir_all(&data_dir)?;
    fs::write(data_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    Ok(data_dir)
}

pub fn cmd_init(start: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Nested projects are allowed, but say so
    if let Some(parent) = start.parent()
        && !start.join(DATA_DIR).is_dir()
        && let Ok(parent_root) = store::discover_project(parent)
    {
        eprintln!(
            "note: parent project found at {}/",
            parent_root.join(DATA_DIR).display()
        );
    }

    init_in(start, args.force)?;
    println!("Initialized ticklist in ./{}/", DATA_DIR);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::read_config;

    #[test]
    fn creates_data_dir_with_default_config() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = init_in(tmp.path(), false).unwrap();
        assert!(data_dir.is_dir());
        let config = read_config(&data_dir).unwrap();
        assert_eq!(config.store.key, "todos");
    }

    #[test]
    fn refuses_existing_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        init_in(tmp.path(), false).unwrap();
        let err = init_in(tmp.path(), false).unwrap_err();
        assert!(err.to_string().contains("already initialized"));
    }

    #[test]
    fn force_rewrites_config_and_keeps_tasks() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = init_in(tmp.path(), false).unwrap();
        fs::write(data_dir.join(CONFIG_FILE), "[store]\nkey = \"other\"\n").unwrap();
        fs::write(data_dir.join("todos.json"), "[]").unwrap();

        init_in(tmp.path(), true).unwrap();
        assert_eq!(fs::read_to_string(data_dir.join(CONFIG_FILE)).unwrap(), DEFAULT_CONFIG);
        assert!(data_dir.join("todos.json").exists());
    }
}
