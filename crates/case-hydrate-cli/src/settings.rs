//! Configuration for the CLI.
//!
//! Sources, lowest precedence first: built-in defaults, the config file
//! (`case-hydrate.toml` in the working directory unless `--config` is given),
//! then `CASE_HYDRATE__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};

use case_hydrate_core::HydrationConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub hydration: HydrationConfig,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file holding the lookup tables
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// Consult the inventory table for medicines missing from master data.
    /// Environment variable: `CASE_HYDRATE__DATABASE__INVENTORY_FALLBACK`
    #[serde(default = "default_true")]
    pub inventory_fallback: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("case-hydrate.db")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("case-hydrate").required(false),
        };
        let hydration = HydrationConfig::default();

        let settings = config::Config::builder()
            .set_default("database.path", "case-hydrate.db")?
            .set_default("database.inventory_fallback", default_true())?
            .set_default("hydration.max_depth", hydration.max_depth as i64)?
            .set_default("hydration.max_nodes", hydration.max_nodes as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)?
            .add_source(file_source)
            // CASE_HYDRATE__DATABASE__PATH → database.path
            .add_source(
                config::Environment::with_prefix("CASE_HYDRATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
