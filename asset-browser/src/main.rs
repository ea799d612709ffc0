//! # asset-browser
//!
//! Command-line host for asset store providers.
//!
//! The host loads its configuration, registers the EcoPlants provider, and
//! runs searches through the same timeout wrapper the browser UI uses.
//!
//! ## Running
//!
//! ```bash
//! # Search the Vehicles category, first page of 30
//! cargo run --bin asset-browser -- search --category /Vehicles --page 1 --page-size 30
//!
//! # List providers and their enable flags
//! cargo run --bin asset-browser -- providers
//!
//! # With debug logging
//! RUST_LOG=debug cargo run --bin asset-browser -- search
//! ```

use anyhow::{Context, Result};
use asset_browser::config::Config;
use asset_browser::registry::ProviderRegistry;
use asset_browser::settings::FileSettingStore;
use asset_store_core::prelude::*;
use clap::{Parser, Subcommand};
use provider_ecoplants::EcoPlantsProvider;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "asset-browser", version, about = "Search asset store providers")]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a search and print the results as JSON
    Search(SearchCommand),
    /// List registered providers
    Providers,
    /// Enable a provider in the persisted settings
    Enable { provider: String },
    /// Disable a provider in the persisted settings
    Disable { provider: String },
}

#[derive(Debug, Parser, Clone)]
struct SearchCommand {
    /// Provider to search; searches every enabled provider when omitted
    #[arg(long)]
    provider: Option<String>,
    /// Category path such as /Architecture/House (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Keyword (repeatable)
    #[arg(long = "keyword")]
    keywords: Vec<String>,
    /// Page number
    #[arg(long)]
    page: Option<u32>,
    /// Page size
    #[arg(long)]
    page_size: Option<u32>,
}

impl SearchCommand {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            keywords: self.keywords.clone(),
            filter: SearchFilter {
                categories: self.categories.clone(),
            },
            page: PageRequest {
                number: self.page,
                size: self.page_size,
            },
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    init_logging(&config.browser.log_level);
    info!("Starting asset-browser v{}", env!("CARGO_PKG_VERSION"));

    let settings = Arc::new(FileSettingStore::new(config.settings_path()?));
    info!("Using settings file {}", settings.path().display());

    let mut registry = ProviderRegistry::new(config.browser.search_timeout());
    let ecoplants = EcoPlantsProvider::new(config.providers.ecoplants.clone(), settings.clone())
        .context("Failed to create EcoPlants provider")?;
    registry.register(ecoplants);

    info!("Registered provider(s): {:?}", registry.list());

    match cli.command {
        Command::Search(search) => run_search(&registry, &search).await,
        Command::Providers => {
            let providers: Vec<_> = registry.describe().into_iter().map(|(_, p)| p).collect();
            println!("{}", serde_json::to_string_pretty(&providers)?);
            Ok(())
        }
        Command::Enable { provider } => set_enabled(&registry, &settings, &provider, true),
        Command::Disable { provider } => set_enabled(&registry, &settings, &provider, false),
    }
}

async fn run_search(registry: &ProviderRegistry, search: &SearchCommand) -> Result<()> {
    let criteria = search.criteria();

    let results = match &search.provider {
        Some(id) => vec![(id.clone(), registry.search(id, &criteria).await)],
        None => registry.search_enabled(&criteria).await,
    };

    let mut output = serde_json::Map::new();
    for (id, result) in results {
        let value = match result {
            Ok(Some(page)) => serde_json::to_value(&page)?,
            Ok(None) => serde_json::json!({"assets": null, "more": false, "note": "no categories to search"}),
            Err(e) => serde_json::json!({"error": e.to_string()}),
        };
        output.insert(id, value);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn set_enabled(
    registry: &ProviderRegistry,
    settings: &FileSettingStore,
    id: &str,
    enabled: bool,
) -> Result<()> {
    let provider = registry
        .get(id)
        .with_context(|| format!("Unknown provider: {id}"))?;
    let key = provider
        .provider()
        .enable_setting
        .with_context(|| format!("Provider {id} has no enable setting"))?;

    settings.set_bool(&key, enabled)?;
    println!("{id}: enabled = {enabled}");
    Ok(())
}
