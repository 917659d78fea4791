//! searchrev: attributes purchase revenue in hit-level exports to the search
//! engine and keyword that brought each visitor in.
//!
//! Reads its inputs from a storage notification (`--event`) or from
//! `--input bucket/key` arguments and prints one outcome per input.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use searchrev_core::AppConfig;
use searchrev_pipeline::{HitProcessor, InputEvent};
use searchrev_storage::{LocalFsStore, ObjectLocation};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "searchrev")]
#[command(about = "Search keyword revenue attribution over hit-level data")]
#[command(version)]
struct Cli {
    /// Storage notification (JSON) listing the inputs to process
    #[arg(long, conflicts_with = "input", required_unless_present = "input")]
    event: Option<PathBuf>,

    /// Input object as `<bucket>/<key>`; may be repeated
    #[arg(long)]
    input: Vec<ObjectLocation>,

    /// Directory holding one sub-directory per bucket (overrides config)
    #[arg(long, env = "SEARCHREV__STORAGE__ROOT")]
    storage_root: Option<String>,

    /// Domain label of the analyzed site (overrides config)
    #[arg(long, env = "SEARCHREV__ATTRIBUTION__TARGET_SITE")]
    target_site: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "searchrev=info,searchrev_pipeline=info,searchrev_attribution=info,\
                 searchrev_reporting=info,searchrev_storage=info"
                    .into()
            }),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(root) = cli.storage_root {
        config.storage.root = root;
    }
    if let Some(site) = cli.target_site {
        config.attribution.target_site = site;
    }

    info!(
        storage_root = %config.storage.root,
        target_site = %config.attribution.target_site,
        "Configuration loaded"
    );

    let event = match cli.event {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading event file {}", path.display()))?;
            serde_json::from_str::<InputEvent>(&raw)
                .with_context(|| format!("parsing event file {}", path.display()))?
        }
        None => InputEvent::from_locations(cli.input),
    };

    let store = Arc::new(LocalFsStore::from_config(&config.storage));
    let processor = HitProcessor::new(store, &config);
    let outcomes = processor.handle_event(&event).await;

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}
