use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sparkr::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sparkr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            model,
            tokenizer,
            temp,
            max_tokens,
            seed,
        } => {
            sparkr::cli::chat(model, tokenizer, temp, max_tokens, seed).await?;
        }
        Commands::Generate {
            gguf,
            repo,
            prompt,
            max_tokens,
            temp,
            seed,
            tokenizer,
        } => {
            sparkr::cli::generate(gguf, repo, prompt, max_tokens, temp, seed, tokenizer).await?;
        }
        Commands::List { verbose, json } => {
            sparkr::cli::list(verbose, json).await?;
        }
        Commands::Info { model } => {
            sparkr::cli::info(model).await?;
        }
        Commands::Pull { repo, file, output } => {
            sparkr::cli::pull(repo, file, output).await?;
        }
        Commands::Quick => {
            sparkr::cli::quick().await?;
        }
    }

    Ok(())
}
