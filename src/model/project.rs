use std::path::PathBuf;

use super::config::Config;

/// A discovered ticklist directory and its configuration
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing `.ticklist/`
    pub root: PathBuf,
    /// The `.ticklist/` directory itself
    pub data_dir: PathBuf,
    pub config: Config,
}
