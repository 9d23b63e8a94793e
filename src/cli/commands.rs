use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("[x] ticklist v", env!("CARGO_PKG_VERSION"), " - a to-do list for the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// Initial filter for the TUI: #/, #/active or #/completed
    #[arg(long)]
    pub route: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .ticklist/ directory here
    Init(InitArgs),
    /// List tasks
    List(ListArgs),
    /// Add a task
    Add(TextArgs),
    /// Flip a task between done and not done
    Toggle(PositionArgs),
    /// Replace a task's text
    Edit(EditArgs),
    /// Delete a task
    Rm(PositionArgs),
    /// Set a value in config.toml
    Config(ConfigArgs),
    /// Show the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite config.toml if .ticklist/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list tasks matching this route (#/, #/active, #/completed)
    #[arg(long)]
    pub route: Option<String>,
}

#[derive(Args)]
pub struct TextArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct PositionArgs {
    /// 1-based position in the full list (as printed by `tl list`)
    pub position: usize,
}

#[derive(Args)]
pub struct EditArgs {
    /// 1-based position in the full list
    pub position: usize,
    /// New text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. input.click_delay_ms
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}
