use clap::Parser;
use ticklist::cli::commands::Cli;
use ticklist::cli::handlers;

fn main() {
    let cli = Cli::parse();

    // No subcommand launches the TUI; init runs before project discovery
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
