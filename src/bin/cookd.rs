//! cookd: letthemcook daemon.
//!
//! Loads the classifier and recipe database once, then serves the JSON API
//! and the browser dashboard over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use letthemcook::server::{self, Config};

/// letthemcook daemon: food classification service.
#[derive(Parser)]
#[command(name = "cookd")]
#[command(version = letthemcook::PKG_VERSION)]
#[command(about = "Food image classification daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to (overrides `server.address`).
    #[arg(short, long, env = "COOK_ADDRESS")]
    address: Option<String>,

    /// ONNX model file (overrides `model.path`).
    #[arg(short, long, env = "COOK_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Recipe database JSON file (overrides `recipes.path`).
    #[arg(short, long, env = "COOK_RECIPES_PATH")]
    recipes: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info for the daemon; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(recipes) = args.recipes {
        config.recipes.path = recipes;
    }

    info!(version = letthemcook::version_string(), "cookd starting");

    // A service that cannot classify is not allowed to start.
    let pipeline = match config.pipeline_builder().and_then(|b| b.build()) {
        Ok(pipeline) => Arc::new(pipeline),
        Err(e) => {
            error!("failed to load prediction pipeline: {e}");
            return Err(e.into());
        }
    };

    server::serve(pipeline, &config.server).await?;

    Ok(())
}
