mod config;
mod dispatch;
mod serve;
#[cfg(test)]
mod test_util;

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use tabi_blob::{BlobStore, HttpBlobStore, MemoryBlobStore};
use tabi_core::model::{Destination, TripRequest};
use tabi_core::provider::GeminiClient;
use tabi_core::{PlanStore, PromptEngine};

use config::TabiConfig;
use serve::AppState;

#[derive(Parser)]
#[command(name = "tabi", about = "AI travel itinerary backend for Japan trips")]
struct Cli {
    /// Bind address (overrides TABI_BIND env var)
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port (overrides TABI_PORT env var)
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP dispatcher
    Serve {
        /// Keep plans in process memory instead of the blob backend
        #[arg(long)]
        memory_store: bool,
    },
    /// Generate one itinerary and print it as JSON
    Generate {
        /// Destination: osaka-kyoto, tokyo, or fukuoka
        #[arg(long)]
        destination: Destination,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Comma-separated must-visit places
        #[arg(long, value_delimiter = ',')]
        must_visit: Vec<String>,
        /// Ask the provider for a schema-constrained reply
        #[arg(long)]
        structured: bool,
    },
    /// Ask a free-text travel question and print the answer
    Search {
        /// The question
        query: String,
    },
}

/// Build the generation engine, or `None` when no credential is configured.
fn build_engine(config: &TabiConfig) -> Option<PromptEngine> {
    let api_key = config.gemini_api_key.as_deref()?;
    let client = GeminiClient::new(api_key, &config.gemini_model);
    Some(PromptEngine::new(Arc::new(client)).with_structured_output(config.structured_output))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = TabiConfig::resolve(cli.bind.as_deref(), cli.port)?;

    match cli.command {
        Commands::Serve { memory_store } => {
            let engine = build_engine(&config);
            if engine.is_none() {
                tracing::warn!(
                    "GEMINI_API_KEY is not configured; generatePlan and searchInfo will \
                     answer with a server-configuration error"
                );
            }

            let blob: Arc<dyn BlobStore> = if memory_store {
                tracing::info!("using in-memory plan storage (nothing will persist)");
                Arc::new(MemoryBlobStore::new())
            } else {
                Arc::new(
                    HttpBlobStore::from_config(&config.blob)
                        .context("blob backend not configured")?,
                )
            };
            let store = PlanStore::new(blob, &config.blob.prefix);

            serve::run_serve(AppState { store, engine }, &config.bind, config.port).await?;
        }
        Commands::Generate {
            destination,
            start,
            end,
            must_visit,
            structured,
        } => {
            let engine = build_engine(&config)
                .context("GEMINI_API_KEY is not set; export it or add it to the config file")?;
            let engine = engine.with_structured_output(structured || config.structured_output);

            let request = TripRequest {
                destination,
                start_date: start,
                end_date: end,
                must_visit_places: must_visit,
            };
            let plan = engine.generate_plan(&request).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Search { query } => {
            let engine = build_engine(&config)
                .context("GEMINI_API_KEY is not set; export it or add it to the config file")?;
            let answer = engine.search_info(&query).await?;
            println!("{answer}");
        }
    }

    Ok(())
}
