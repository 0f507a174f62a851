//! cook: letthemcook CLI client
//!
//! Uploads photos to cookd, or classifies them in-process with `cook local`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use letthemcook::client::PredictClient;
use letthemcook::server::wire::PredictResponse;

/// letthemcook CLI client
#[derive(Parser)]
#[command(name = "cook")]
#[command(version = letthemcook::PKG_VERSION)]
#[command(about = "Food image classification client")]
struct Args {
    /// Server address
    #[arg(
        short,
        long,
        env = "COOK_ADDRESS",
        default_value = "http://127.0.0.1:5000"
    )]
    address: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check service health
    Health,

    /// List the classes the service can recognise
    Labels,

    /// Classify an image through the running service
    Predict {
        /// Image file (JPEG or PNG)
        image: PathBuf,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Classify an image in-process without a running service
    #[cfg(feature = "server")]
    Local {
        /// Image file (JPEG or PNG)
        image: PathBuf,
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let client = || PredictClient::new(&args.address);

    match args.command {
        Command::Health => {
            let health = client()?.health().await?;
            println!("Status:     {}", health.status);
            println!("Version:    {}", health.version);
            println!("Classifier: {}", health.classifier);
            println!("Labels:     {}", health.labels);
            println!("Recipes:    {}", health.recipes);
        }
        Command::Labels => {
            for label in client()?.labels().await? {
                println!("{label}");
            }
        }
        Command::Predict { image, json } => {
            let response = client()?.predict_file(&image).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_prediction(&response);
            }
        }
        // Runs without a cookd connection
        #[cfg(feature = "server")]
        Command::Local { image, config } => {
            tokio::task::spawn_blocking(move || run_local(&image, config.as_deref()))
                .await??;
        }
    }

    Ok(())
}

#[cfg(feature = "server")]
fn run_local(image: &std::path::Path, config: Option<&std::path::Path>) -> letthemcook::Result<()> {
    let config = letthemcook::server::Config::load(config)?;
    let pipeline = config.pipeline_builder()?.build()?;
    let bytes = std::fs::read(image)?;
    let result = pipeline.predict(&bytes)?;
    print_prediction(&result.into());
    Ok(())
}

fn print_prediction(response: &PredictResponse) {
    println!("Prediction: {}", response.prediksi_nama);
    println!("Confidence: {}", response.akurasi_prediksi);
    println!("Calories:   {}", response.kalori_per_sajian);
    println!();
    println!("Ingredients:");
    println!("{}", response.bahan_utama);
    println!();
    println!("Instructions:");
    println!("{}", response.cara_membuat);
}
