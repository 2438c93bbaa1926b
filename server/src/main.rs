//! Entry point: `serve --port <n> --areas <dir> [--config <file>]`.
//! Grounded on the teacher's `main.rs` (logger init, PID log line,
//! signal-driven shutdown) generalized from hand-rolled `env::args()`
//! indexing to `clap`, per SPEC_FULL.md's Configuration section.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dashmap::DashMap;
use log::LevelFilter;
use tokio::sync::watch;

use server::command::build_default_registry;
use server::config::Config;
use server::connection::ConnectionManager;
use server::parsing::load_area_directory;
use server::players::InMemoryPlayerStore;
use server::server::{self as wiring, Shared};
use server::world::{World, WorldDb};

#[derive(Parser)]
#[command(name = "server", version, about = "A MUD server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the server.
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        areas: Option<PathBuf>,
        #[arg(long, default_value = "server.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let Command::Serve { port, areas, config } = cli.command;
    let mut config = Config::load(&config)?;
    if let Some(port) = port {
        config.bind.set_port(port);
    }
    if let Some(areas) = areas {
        config.areas = areas;
    }

    let log_level = config.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    core::initialize_logger(log_level, config.log_file.as_deref()).unwrap_or_else(|e| {
        eprintln!("failed to initialize logger: {e}. exiting.");
        process::exit(1);
    });

    log::info!("starting server, pid {}", process::id());

    let db = WorldDb::new();
    load_area_directory(&db, &config.areas)?;
    let world = Arc::new(World::new(db));

    let shared = Arc::new(Shared {
        world,
        connections: Arc::new(ConnectionManager::new()),
        registry: Arc::new(build_default_registry()),
        players: Arc::new(InMemoryPlayerStore::new()),
        sessions: Arc::new(DashMap::new()),
        connection_tasks: Arc::new(DashMap::new()),
        config,
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("ctrl-c received, shutting down");
        let _ = shutdown_tx.send(true);
    });

    wiring::run(shared, shutdown_rx).await
}
