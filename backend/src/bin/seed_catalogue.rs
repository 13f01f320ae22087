//! Load events and their ticket types into the catalogue tables.
//!
//! The input is a JSON array of events in the API's camelCase shape. Every
//! event is validated before anything is written; each upsert replaces the
//! event's ticket types.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;

use ticketing::domain::Event;
use ticketing::domain::ports::EventRepository;
use ticketing::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig, run_migrations};

/// `seed-catalogue` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-catalogue",
    about = "Upsert catalogue events from a JSON file",
    version
)]
struct CliArgs {
    /// Path to a JSON array of events.
    #[arg(long = "file", value_name = "path")]
    file: PathBuf,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Do not apply pending migrations before seeding.
    #[arg(long = "skip-migrations")]
    skip_migrations: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(seed(args))
}

async fn seed(args: CliArgs) -> Result<()> {
    let events = parse_events(&read_file(&args.file)?)?;
    let database_url = resolve_database_url(args.database_url)?;

    if !args.skip_migrations {
        run_migrations(&database_url)
            .await
            .wrap_err("apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;
    let repository = DieselEventRepository::new(pool);

    for event in &events {
        repository
            .upsert(event)
            .await
            .wrap_err_with(|| format!("upsert event {}", event.id()))?;
    }
    println!("seeded_events={}", events.len());
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("input path must be a file: {}", path.display()))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open input directory '{}'", parent.display()))?;
    let mut file = directory
        .open(Path::new(file_name))
        .wrap_err_with(|| format!("open input file '{}'", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .wrap_err_with(|| format!("read input file '{}'", path.display()))?;
    Ok(bytes)
}

fn parse_events(bytes: &[u8]) -> Result<Vec<Event>> {
    serde_json::from_slice(bytes).wrap_err("parse events JSON")
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    let url = match explicit {
        Some(value) => value,
        None => env::var("DATABASE_URL")
            .map_err(|_| eyre!("database URL missing: set --database-url or DATABASE_URL"))?,
    };
    if url.trim().is_empty() {
        return Err(eyre!("database URL must not be empty"));
    }
    Ok(url)
}
