use anyhow::Result;
use clap::{Parser, Subcommand};
use nooks_core::{Nook, SelectionController, SqliteStore, TomlPrefs};
use std::path::PathBuf;

mod config;

#[derive(Parser)]
#[command(name = "nooks", version, about = "Manage and navigate your nooks")]
struct Cli {
    /// Database path (overrides the default data dir)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Preferences file path (overrides the default state dir)
    #[arg(long)]
    state: Option<PathBuf>,
    /// Filter text applied before the command runs
    #[arg(long)]
    filter: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the visible nooks, marking the current selection
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print the current selection
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Create a nook, or select the existing one with the same name
    Create { name: String },
    /// Rename a nook (the renamed nook becomes the selection)
    Rename { id: String, new_name: String },
    /// Point a nook at a different url
    SetUrl { id: String, url: String },
    /// Delete a nook
    Delete { id: String },
    /// Select the nook at a visible index (out of range does nothing)
    Select { index: usize },
    /// Select the next visible nook, wrapping around
    Next,
    /// Select the previous visible nook, wrapping around
    Prev,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db = cli.db.unwrap_or_else(config::db_path);
    if let Some(dir) = db.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let store = SqliteStore::new(&db)?;
    let prefs = TomlPrefs::new(cli.state.unwrap_or_else(config::prefs_path));
    let mut controller = SelectionController::new(Box::new(store), Box::new(prefs))?;
    if let Some(filter) = cli.filter {
        controller.set_filter_text(filter);
    }

    match cli.command {
        Commands::List { json } => {
            let visible = controller.visible_nooks();
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                let selected = controller.selection().map(|n| n.id.clone());
                for n in visible {
                    let mark = if selected.as_deref() == Some(n.id.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{}\t{}\t{}\t{}", n.id, mark, n.name, n.url);
                }
            }
        }
        Commands::Show { json } => {
            if let Some(n) = controller.selection() {
                if json {
                    println!("{}", serde_json::to_string_pretty(n)?);
                } else {
                    println!("{}\t{}\t{}", n.id, n.name, n.url);
                }
            }
        }
        Commands::Create { name } => match controller.create(&name) {
            Some(n) => println!("{}", n.id),
            None => anyhow::bail!("create {name:?} was declined"),
        },
        Commands::Rename { id, new_name } => {
            let nook = find_nook(&controller, &id)?;
            match controller.rename(&nook, &new_name) {
                Some(n) => println!("renamed {} to {}", n.id, n.name),
                None => anyhow::bail!("rename of {id} was declined"),
            }
        }
        Commands::SetUrl { id, url } => {
            let mut nook = find_nook(&controller, &id)?;
            nook.url = url;
            match controller.update(&nook) {
                Some(n) => println!("updated {}", n.id),
                None => anyhow::bail!("update of {id} was declined"),
            }
        }
        Commands::Delete { id } => {
            let nook = find_nook(&controller, &id)?;
            controller.delete(&nook)?;
            println!("deleted {id}");
        }
        Commands::Select { index } => {
            controller.select_by_index(index);
            print_selection(&controller);
        }
        Commands::Next => {
            controller.select_next();
            print_selection(&controller);
        }
        Commands::Prev => {
            controller.select_previous();
            print_selection(&controller);
        }
    }

    Ok(())
}

fn find_nook(controller: &SelectionController, id: &str) -> Result<Nook> {
    controller
        .nooks()
        .iter()
        .find(|n| n.id == id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no nook with id {id}"))
}

fn print_selection(controller: &SelectionController) {
    if let Some(n) = controller.selection() {
        println!("{}\t{}", n.id, n.name);
    }
}
