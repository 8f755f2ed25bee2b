//! Creative Pilot — ad creative compliance service.
//!
//! Main entry point: loads configuration and rules, then serves the HTTP API.

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use creative_api::{ApiServer, AppState};
use creative_core::config::AppConfig;
use creative_core::types::BrandKit;
use creative_guidelines::{GuidelineEngine, RuleCatalog};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "creative-pilot")]
#[command(about = "Validates ad creatives against retailer brand and legal guidelines")]
#[command(version)]
struct Cli {
    /// Config file (TOML, YAML or JSON)
    #[arg(long, env = "CREATIVE_PILOT_CONFIG")]
    config: Option<String>,

    /// Node identifier (overrides config)
    #[arg(long, env = "CREATIVE_PILOT__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CREATIVE_PILOT__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// JSON rule catalog replacing the built-in rules (overrides config)
    #[arg(long, env = "CREATIVE_PILOT__GUIDELINES__RULES_PATH")]
    rules: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "creative_pilot=info,creative_guidelines=info,creative_api=info,tower_http=info"
                    .into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Creative Pilot starting up");

    // Load configuration
    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(rules) = cli.rules {
        config.guidelines.rules_path = Some(rules);
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        rules_path = ?config.guidelines.rules_path,
        "Configuration loaded"
    );

    let engine = build_engine(config.guidelines.rules_path.as_deref())?;
    info!(
        rules_version = %engine.catalog().catalog().version,
        copy_rules = engine.catalog().copy_rules().len(),
        "Guideline engine ready"
    );

    let default_brand_kit = config
        .guidelines
        .default_brand_kit_path
        .as_deref()
        .and_then(|path| match load_brand_kit(path) {
            Ok(kit) => Some(kit),
            Err(e) => {
                warn!(path, error = %e, "Failed to load default brand kit, continuing without");
                None
            }
        });

    let state = AppState::new(engine, &config.node_id, &config.store)
        .with_default_brand_kit(default_brand_kit);
    let api_server = ApiServer::new(config.clone(), state);

    // Start metrics exporter
    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics() {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("Creative Pilot is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}

/// Engine over the configured catalog, or the built-in one when the file is
/// missing or unreadable.
fn build_engine(rules_path: Option<&str>) -> anyhow::Result<GuidelineEngine> {
    if let Some(path) = rules_path {
        match RuleCatalog::load(path).and_then(|catalog| GuidelineEngine::with_catalog(&catalog)) {
            Ok(engine) => return Ok(engine),
            Err(e) => warn!(path, error = %e, "Failed to load rule catalog, using built-in rules"),
        }
    }
    GuidelineEngine::new().context("built-in rule catalog failed to compile")
}

fn load_brand_kit(path: &str) -> anyhow::Result<BrandKit> {
    let raw = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("reading brand kit {path}"))?;
    Ok(serde_json::from_str(&raw)?)
}
