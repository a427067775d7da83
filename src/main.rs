mod cli;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use todokit::{Backend, BlobStorage, Controller, Store, StoreConfig, TodoId, TodoModel};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::app::App;
use crate::cli::console::{ConsoleView, pump_events};

#[derive(Parser)]
#[command(name = "todokit")]
#[command(about = "Task list kept in a single local blob")]
struct Cli {
    /// Collection name (storage key)
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Directory holding collection files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep the collection in memory only
    #[arg(long, global = true)]
    memory: bool,

    /// Print render commands as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the todos for a route ("", "#/", "#/active", "#/completed" or a bare name)
    List {
        #[arg(default_value = "#/")]
        route: String,
    },
    Add {
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Mark a todo completed (or active again with --undo)
    Toggle {
        id: TodoId,
        #[arg(long)]
        undo: bool,
    },
    /// Show the stored title of a todo for editing
    Edit { id: TodoId },
    /// Replace a todo's title; an empty title deletes it
    Rename { id: TodoId, title: Vec<String> },
    Remove { id: TodoId },
    ToggleAll {
        #[arg(long)]
        undo: bool,
    },
    ClearCompleted,
    /// Delete every todo in the collection
    Reset,
    /// Read route changes and view events as JSON lines from stdin
    Events,
    /// Interactive terminal UI
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Tui));

    let config = load_config(&cli)?;
    info!(collection = %config.collection, backend = ?config.backend, "opening todo collection");
    let store = config
        .open()
        .with_context(|| format!("failed to open collection '{}'", config.collection))?;

    if let Command::Tui = cli.command {
        return App::new(store)
            .run()
            .map_err(|e| anyhow!("terminal UI failed: {e}"));
    }

    let stdout = io::stdout();
    let view = ConsoleView::new(stdout.lock(), cli.json);
    let mut controller = Controller::new(store, view);
    run_command(&mut controller, cli.command)?;

    let (_, view) = controller.into_parts();
    view.into_inner()
        .and_then(|mut out| out.flush())
        .context("failed to write output")?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = StoreConfig::from_env()
        .map_err(|e| anyhow!(e))
        .context("invalid TODOKIT_* environment")?;
    if let Some(collection) = &cli.collection {
        config = config.collection(collection);
    }
    if let Some(data_dir) = &cli.data_dir {
        config = config.data_dir(data_dir);
    }
    if cli.memory {
        config = config.backend(Backend::Memory);
    }
    config.validate().map_err(|e| anyhow!(e))?;
    Ok(config)
}

fn run_command<S, W>(controller: &mut Controller<Store<S>, ConsoleView<W>>, command: Command) -> Result<()>
where
    S: BlobStorage,
    W: Write,
{
    match command {
        Command::List { route } => {
            let fragment = if route.is_empty() || route.starts_with('#') {
                route
            } else {
                format!("#/{route}")
            };
            controller.set_view(&fragment)?;
        }
        Command::Add { title } => controller.add_item(&title.join(" "))?,
        Command::Toggle { id, undo } => controller.toggle_complete(id, !undo)?,
        Command::Edit { id } => controller.edit_item(id)?,
        Command::Rename { id, title } => controller.edit_item_save(id, &title.join(" "))?,
        Command::Remove { id } => controller.remove_item(id)?,
        Command::ToggleAll { undo } => controller.toggle_all(!undo)?,
        Command::ClearCompleted => controller.remove_completed()?,
        Command::Reset => {
            controller.model().remove_all()?;
            controller.set_view("#/")?;
        }
        Command::Events => {
            controller.set_view("")?;
            pump_events(controller, io::stdin().lock())?;
        }
        Command::Tui => return Err(anyhow!("the terminal UI cannot run on a console view")),
    }
    Ok(())
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(interactive: bool) -> &'static str {
    // The terminal UI owns the screen; stay quiet unless asked
    if interactive { "off" } else { "todokit=info" }
}

fn init_tracing(interactive: bool) {
    let default = default_filter(interactive);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
