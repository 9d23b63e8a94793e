mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::store::{self, FileStorage};
use crate::model::{Filter, Project, TodoList};
use crate::ops::list_ops;

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let start = start_dir(cli.project_dir.as_deref())?;

    match cli.command {
        None => crate::tui::run(&start, cli.route.as_deref()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(&start, args),

            // Read commands
            Commands::List(args) => cmd_list(&start, args, json),
            Commands::Recovery(args) => cmd_recovery(&start, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&start, args, json),
            Commands::Toggle(args) => cmd_toggle(&start, args, json),
            Commands::Edit(args) => cmd_edit(&start, args, json),
            Commands::Rm(args) => cmd_rm(&start, args, json),
            Commands::Config(args) => cmd_config(&start, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory to start project discovery from: `-C` if given, else the cwd
fn start_dir(project_dir: Option<&str>) -> Result<PathBuf, Box<dyn Error>> {
    match project_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_project_from(start: &Path) -> Result<Project, store::StoreError> {
    let root = store::discover_project(start)?;
    store::load_project(&root)
}

fn join_text(words: &[String]) -> String {
    words.join(" ")
}

fn print_item(list: &TodoList, position: usize, json: bool) -> CmdResult {
    let Some(item) = list.at(position - 1) else {
        return Ok(());
    };
    if json {
        let out = ItemJson {
            position,
            text: item.text.clone(),
            done: item.done,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let lines = format_item_lines(&items_to_json(list, Filter::All));
        println!("{}", lines[position - 1].trim_start());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(start: &Path, args: ListArgs, json: bool) -> CmdResult {
    let project = load_project_from(start)?;
    let storage = FileStorage::for_project(&project);
    let list = store::load_list(&storage);
    let filter = args
        .route
        .as_deref()
        .map_or(Filter::All, Filter::from_route);
    let items = items_to_json(&list, filter);
    let (active, completed) = list_ops::counts(&list);

    if json {
        let out = ListJson {
            filter,
            route: filter.route(),
            active,
            completed,
            items,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_item_lines(&items) {
            println!("{}", line);
        }
        if !list.is_empty() {
            println!("{}", format_counts(active, completed));
        }
    }
    Ok(())
}

fn cmd_recovery(start: &Path, args: RecoveryArgs, json: bool) -> CmdResult {
    let project = load_project_from(start)?;
    let limit = args.limit.unwrap_or(10);
    let entries = recovery::read_recovery_entries(&project.data_dir, Some(limit));

    if json {
        let out: Vec<RecoveryEntryJson> = entries.iter().map(recovery_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", format_recovery_entry(entry));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(start: &Path, args: TextArgs, json: bool) -> CmdResult {
    let project = load_project_from(start)?;
    let storage = FileStorage::for_project(&project);
    let text = join_text(&args.text);

    let (list, position) = storage.update(|list| -> Result<_, Box<dyn Error>> {
        list_ops::add_item(list, &text)?;
        Ok((list.clone(), list.len()))
    })?;
    print_item(&list, position, json)
}

fn cmd_toggle(start: &Path, args: PositionArgs, json: bool) -> CmdResult {
    let project = load_project_from(start)?;
    let storage = FileStorage::for_project(&project);

    let list = storage.update(|list| -> Result<_, Box<dyn Error>> {
        let id = list_ops::resolve_position(list, args.position)?;
        list_ops::toggle_item(list, id);
        Ok(list.clone())
    })?;
    print_item(&list, args.position, json)
}

fn cmd_edit(start: &Path, args: EditArgs, json: bool) -> CmdResult {
    let project = load_project_from(start)?;
    let storage = FileStorage::for_project(&project);
    let text = join_text(&args.text);
    if text.trim().is_empty() {
        return Err(list_ops::ListError::BlankText.into());
    }

    let list = storage.update(|list| -> Result<_, Box<dyn Error>> {
        let id = list_ops::resolve_position(list, args.position)?;
        list_ops::commit_text(list, id, &text);
        Ok(list.clone())
    })?;
    print_item(&list, args.position, json)
}

fn cmd_rm(start: &Path, args: PositionArgs, json: bool) -> CmdResult {
    let project = load_project_from(start)?;
    let storage = FileStorage::for_project(&project);

    let removed = storage.update(|list| -> Result<_, Box<dyn Error>> {
        let id = list_ops::resolve_position(list, args.position)?;
        Ok(list_ops::delete_item(list, id))
    })?;

    if let Some(item) = removed {
        if json {
            let out = ItemJson {
                position: args.position,
                text: item.text,
                done: item.done,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("removed: {}", item.text);
        }
    }
    Ok(())
}

fn cmd_config(start: &Path, args: ConfigArgs) -> CmdResult {
    let project = load_project_from(start)?;
    let mut doc = config_io::read_config_doc(&project.data_dir)?;
    config_io::set_config_value(&mut doc, &args.key, &args.value)?;
    config_io::write_config_doc(&project.data_dir, &doc)?;
    println!("{} = {}", args.key, args.value);
    Ok(())
}
