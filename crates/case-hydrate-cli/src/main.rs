//! `case-hydrate`: hydrate case documents and maintain the lookup tables
//! from the command line.
//!
//! Logs go to stderr so stdout carries only the document.

mod import;
mod settings;

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use case_hydrate_core::{Database, Hydrator, InventoryStore, LookupStores, MasterDataStore};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use settings::{LoggingSettings, Settings};

#[derive(Parser)]
#[command(
    name = "case-hydrate",
    about = "Resolve lookup references in clinical case documents",
    version,
    arg_required_else_help = true
)]
struct Cli {
    /// Config file. Defaults to ./case-hydrate.toml when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hydrate one case document (JSON).
    Hydrate {
        /// Path to the document, or "-" for stdin (the default).
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the output.
        #[arg(long, action = ArgAction::SetTrue)]
        pretty: bool,
        /// Exit non-zero when any field could not be hydrated.
        #[arg(long, action = ArgAction::SetTrue)]
        strict: bool,
    },

    /// Upsert lookup entries from a JSON array of { id?, name, category }.
    Import {
        /// Path to the entries file.
        #[arg(long)]
        entries: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Hydrate {
            input,
            output,
            pretty,
            strict,
        } => hydrate(&settings, input.as_deref(), output.as_deref(), pretty, strict).await,
        Commands::Import { entries } => run_import(&settings, &entries),
    }
}

fn init_tracing(logging: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn open_database(settings: &Settings) -> Result<Database> {
    let path = &settings.database.path;
    Database::open(path)
        .with_context(|| format!("Failed to open lookup database '{}'", path.display()))
}

fn open_stores(settings: &Settings) -> Result<LookupStores> {
    let db = Arc::new(Mutex::new(open_database(settings)?));

    let stores = LookupStores::new(Arc::new(MasterDataStore::new(Arc::clone(&db))));
    if settings.database.inventory_fallback {
        Ok(stores.with_inventory(Arc::new(InventoryStore::new(db))))
    } else {
        Ok(stores)
    }
}

fn read_document(input: Option<&Path>) -> Result<Value> {
    match input {
        None => read_stdin(),
        Some(path) if path.to_string_lossy() == "-" => read_stdin(),
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read case document '{}'", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Case document is not valid JSON: {}", path.display()))
        }
    }
}

fn read_stdin() -> Result<Value> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read case document from stdin")?;
    serde_json::from_str(&buf).context("stdin case document is not valid JSON")
}

fn write_document(document: &Value, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut rendered = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    rendered.push('\n');

    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

async fn hydrate(
    settings: &Settings,
    input: Option<&Path>,
    output: Option<&Path>,
    pretty: bool,
    strict: bool,
) -> Result<()> {
    let document = read_document(input)?;
    let hydrator = Hydrator::with_config(open_stores(settings)?, settings.hydration.clone());

    let hydrated = hydrator.hydrate(&document).await?;
    write_document(&hydrated.document, output, pretty)?;

    if !hydrated.unresolved.is_empty() {
        tracing::info!(
            count = hydrated.unresolved.len(),
            "References with no lookup entry were left as ids"
        );
    }

    if strict && !hydrated.is_complete() {
        let fields: Vec<&str> = hydrated.failures.iter().map(|f| f.field.as_str()).collect();
        anyhow::bail!("Could not hydrate: {}", fields.join(", "));
    }
    Ok(())
}

fn run_import(settings: &Settings, entries: &Path) -> Result<()> {
    let contents = fs::read_to_string(entries)
        .with_context(|| format!("Failed to read entries file '{}'", entries.display()))?;
    let records = import::parse_entries(&contents)?;

    let db = open_database(settings)?;
    let summary = import::import_entries(&db, &records)?;

    tracing::info!(
        lookup = summary.lookup,
        inventory = summary.inventory,
        "Imported lookup entries"
    );
    Ok(())
}
