//! photolens-models: inspect which Gemini models the configured key can use.
//!
//! Reads `GEMINI_API_KEY` (and the other `GEMINI_*` settings) from the
//! environment or a `.env` file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use photolens_inference::models::{available_recommendations, model_id, supports_generation};
use photolens_inference::{GeminiBackend, GeminiConfig, GenerationBackend, RECOMMENDED_MODELS};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "photolens-models")]
#[command(author, version, about = "Gemini model discovery for photolens")]
#[command(propagate_version = true)]
struct Cli {
    /// Override the API base URL
    #[arg(long, env = "GEMINI_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List models available to the configured key
    List {
        /// Include models that cannot generate content
        #[arg(short, long)]
        all: bool,
    },

    /// Show the recommended model table
    Recommended,

    /// Check that the configured default model is available
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = GeminiConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Recommended => {
            for model in RECOMMENDED_MODELS {
                println!("{:<20} {}", model.name, model.note);
            }
        }
        Commands::List { all } => {
            let backend = GeminiBackend::new(config).context("creating Gemini client")?;
            let models = backend.list_models().await.context("listing models")?;
            let mut shown = 0;
            for model in models.iter().filter(|m| all || supports_generation(m)) {
                if let Some(id) = model_id(model) {
                    println!("{}", id);
                    shown += 1;
                }
            }
            println!("\n{} of {} models shown", shown, models.len());
        }
        Commands::Check => {
            let backend = GeminiBackend::new(config).context("creating Gemini client")?;
            if !backend.health_check().await? {
                bail!("Gemini API is not reachable with the configured key");
            }
            let models = backend.list_models().await.context("listing models")?;
            let default_model = backend.model_name();

            if models.iter().any(|m| model_id(m) == Some(default_model)) {
                println!("{} is available", default_model);
                return Ok(());
            }

            eprintln!("{} is not available to this key", default_model);
            let alternatives = available_recommendations(&models);
            if alternatives.is_empty() {
                bail!("no recommended model is available");
            }
            eprintln!("Available recommended models:");
            for model in alternatives {
                eprintln!("  {:<20} {}", model.name, model.note);
            }
            bail!("configured model {} is unavailable", default_model);
        }
    }

    Ok(())
}
