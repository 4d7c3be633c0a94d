//! One-shot generation command

use std::io::{self, Write};

use anyhow::Result;

use super::stream_response;
use crate::config::GenerationConfig;
use crate::engine::Executor;
use crate::loader;

/// Generate a single response for a prompt.
pub async fn generate(
    gguf: String,
    repo: Option<String>,
    prompt: String,
    max_tokens: usize,
    temp: f32,
    seed: u64,
    tokenizer: Option<String>,
) -> Result<()> {
    let model_path = loader::resolve_or_fetch(&gguf, repo.as_deref())?;

    let mut executor = Executor::load(&model_path, tokenizer.as_deref(), repo.as_deref())?;

    let config = GenerationConfig {
        max_tokens,
        temperature: temp,
        seed,
        ..Default::default()
    };

    println!("Prompt: {}", prompt);
    print!("Response: ");
    io::stdout().flush()?;

    let stats = stream_response(&mut executor, &prompt, &config).await?;

    println!("{}", "=".repeat(50));
    if stats.generated > 0 {
        println!("Prompt: {:.3} tokens/sec", stats.prompt_tps());
        println!("Generation: {:.3} tokens/sec", stats.gen_tps());
        println!("Generated tokens: {}", stats.generated);
    } else {
        println!("No tokens generated for this prompt");
    }

    Ok(())
}
