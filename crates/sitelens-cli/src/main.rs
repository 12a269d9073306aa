use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sitelens_client::registry::lookup_provider;
use sitelens_client::{ClientFactory, Credentials, FactoryConfig};
use sitelens_core::models::{AnalysisParams, ClientType};

#[derive(Parser)]
#[command(name = "sitelens", version, about = "Analyze websites with large language models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a web page and run an analysis over it
    Analyze {
        /// Website URL to analyze
        #[arg(short, long)]
        url: String,

        /// LLM provider (openai, anthropic, google, ollama)
        #[arg(short, long, env = "SITELENS_PROVIDER", default_value = "openai")]
        provider: String,

        /// Analysis type (summarizer, content_extractor, sentiment_analyzer, seo_analyzer)
        #[arg(short, long, default_value = "summarizer")]
        client_type: String,

        /// Model name (defaults to the provider's default model)
        #[arg(short, long, env = "SITELENS_MODEL")]
        model: Option<String>,

        /// API key (falls back to the provider's *_API_KEY env var)
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// What to extract, for the content_extractor type
        #[arg(short, long)]
        target: Option<String>,
    },

    /// List providers compiled into this build
    Providers,

    /// List available analysis types
    ClientTypes,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sitelens=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            url,
            provider,
            client_type,
            model,
            api_key,
            target,
        } => {
            cmd_analyze(
                &url,
                &provider,
                &client_type,
                model.as_deref(),
                api_key.as_deref(),
                target,
            )
            .await?;
        }
        Commands::Providers => cmd_providers(),
        Commands::ClientTypes => cmd_client_types(),
    }

    Ok(())
}

async fn cmd_analyze(
    url: &str,
    provider: &str,
    client_type: &str,
    model: Option<&str>,
    api_key: Option<&str>,
    target: Option<String>,
) -> Result<()> {
    let config = FactoryConfig::from_env().context("Invalid configuration")?;
    let factory = ClientFactory::new(config);

    let credentials = Credentials::from_env();
    let resolved = lookup_provider(provider)?;
    let key = credentials.resolve(resolved, api_key);

    let client = factory.create_client(provider, client_type, model, key)?;
    let params = AnalysisParams {
        target_info: target,
    };

    tracing::info!(
        provider = %client.provider(),
        model = client.model(),
        client_type = %client.client_type(),
        "Analyzing {}",
        url
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling analysis");
            on_signal.cancel();
        }
    });

    let result = client.process_with_cancel(url, &params, &cancel).await?;

    println!("{result}");

    Ok(())
}

fn cmd_providers() {
    let factory = ClientFactory::default();
    let providers = factory.available_providers();

    if providers.is_empty() {
        println!("No providers compiled into this build");
        return;
    }

    for provider in providers {
        let auth = match provider.credential_env_var() {
            Some(var) => format!("requires {var}"),
            None => "no API key needed".to_string(),
        };
        println!(
            "{:<10} {} (default model: {}, {})",
            provider.as_str(),
            provider.display_name(),
            provider.default_model(),
            auth
        );
        println!("           models: {}", provider.known_models().join(", "));
    }
}

fn cmd_client_types() {
    for client_type in ClientType::ALL {
        println!("{:<20} {}", client_type.as_str(), client_type.label());
    }
}
