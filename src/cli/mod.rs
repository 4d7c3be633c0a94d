//! CLI commands
//!
//! One subcommand per workflow: discover models, chat with one, run a
//! one-shot generation, inspect or download model files.

mod chat;
mod generate;
mod info;
mod list;
mod pull;
mod quick;

pub use chat::chat;
pub use generate::generate;
pub use info::info;
pub use list::list;
pub use pull::pull;
pub use quick::quick;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;

use crate::config::GenerationConfig;
use crate::engine::Executor;

/// sparkr - chat with local GGUF models
#[derive(Parser)]
#[command(name = "sparkr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat with a local GGUF model
    Chat {
        /// Path to a specific GGUF file (skips the selection menu)
        #[arg(long, short)]
        model: Option<PathBuf>,

        /// Tokenizer file, directory, or HuggingFace repo id
        #[arg(long)]
        tokenizer: Option<String>,

        /// Sampling temperature (0 = greedy)
        #[arg(long, default_value = "0.1")]
        temp: f32,

        /// Maximum tokens to generate per reply
        #[arg(long, default_value = "150")]
        max_tokens: usize,

        /// Random seed for the sampler
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Generate text from a prompt (non-interactive)
    Generate {
        /// Path to (or name of) the GGUF file
        #[arg(long)]
        gguf: String,

        /// HuggingFace repo to fetch the file from when it is not local
        #[arg(long)]
        repo: Option<String>,

        /// The prompt to process
        #[arg(long, short, default_value = "Hello, how are you?")]
        prompt: String,

        /// Maximum tokens to generate
        #[arg(long, default_value = "100")]
        max_tokens: usize,

        /// Sampling temperature (0 = greedy)
        #[arg(long, default_value = "0.0")]
        temp: f32,

        /// Random seed for the sampler
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Tokenizer file, directory, or HuggingFace repo id
        #[arg(long)]
        tokenizer: Option<String>,
    },

    /// List GGUF models available locally
    List {
        /// Show GGUF metadata for each model
        #[arg(long, short)]
        verbose: bool,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show model information
    Info {
        /// Model name or path
        model: String,
    },

    /// Pull a GGUF file from HuggingFace Hub
    Pull {
        /// Repository ID (e.g., "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF")
        repo: String,

        /// Specific file to download; omit to list the repo's GGUF files
        #[arg(long)]
        file: Option<String>,

        /// Output directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Chat with the first model found in the HuggingFace cache
    Quick,
}

/// Timing breakdown of one streamed generation.
pub(crate) struct GenStats {
    pub prompt_tokens: usize,
    pub generated: usize,
    pub prompt_time: Duration,
    pub gen_time: Duration,
}

impl GenStats {
    /// Prompt-processing throughput (prompt tokens / time to first token).
    pub fn prompt_tps(&self) -> f64 {
        let secs = self.prompt_time.as_secs_f64();
        if secs > 0.0 {
            self.prompt_tokens as f64 / secs
        } else {
            0.0
        }
    }

    /// Generation throughput. The first token is attributed to prompt
    /// processing, so the rate covers the remaining ones.
    pub fn gen_tps(&self) -> f64 {
        let secs = self.gen_time.as_secs_f64();
        if self.generated > 1 && secs > 0.0 {
            (self.generated - 1) as f64 / secs
        } else {
            0.0
        }
    }
}

/// Stream a generation to stdout, returning timing stats.
///
/// Generation errors are printed and end the stream rather than aborting
/// the command.
pub(crate) async fn stream_response(
    executor: &mut Executor,
    prompt: &str,
    config: &GenerationConfig,
) -> Result<GenStats> {
    let prompt_tokens = executor.token_count(prompt)?;

    let start = Instant::now();
    let mut first_token_at: Option<Instant> = None;
    let mut generated = 0usize;

    {
        let stream = executor.generate(prompt, config);
        let mut stream = std::pin::pin!(stream);

        while let Some(result) = stream.next().await {
            match result {
                Ok(token) => {
                    if first_token_at.is_none() {
                        first_token_at = Some(Instant::now());
                    }
                    print!("{}", token.text);
                    io::stdout().flush()?;
                    generated += 1;
                }
                Err(e) => {
                    eprintln!("\nError during generation: {}", e);
                    break;
                }
            }
        }
    }

    println!();

    let done = Instant::now();
    let first = first_token_at.unwrap_or(done);
    Ok(GenStats {
        prompt_tokens,
        generated,
        prompt_time: first.duration_since(start),
        gen_time: done.duration_since(first),
    })
}

/// Hint text shown whenever a scan comes up empty.
pub(crate) fn print_download_hints() {
    println!("\nTo download a model:");
    println!("  - Via LM Studio: download any GGUF model from the app");
    println!(
        "  - Via sparkr: sparkr pull TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF \
         --file tinyllama-1.1b-chat-v1.0.Q4_0.gguf"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen_tps_excludes_the_first_token() {
        let stats = GenStats {
            prompt_tokens: 10,
            generated: 11,
            prompt_time: Duration::from_secs(1),
            gen_time: Duration::from_secs(2),
        };
        assert_eq!(stats.prompt_tps(), 10.0);
        assert_eq!(stats.gen_tps(), 5.0);
    }

    #[test]
    fn zero_generated_tokens_means_zero_throughput() {
        let stats = GenStats {
            prompt_tokens: 10,
            generated: 0,
            prompt_time: Duration::ZERO,
            gen_time: Duration::ZERO,
        };
        assert_eq!(stats.prompt_tps(), 0.0);
        assert_eq!(stats.gen_tps(), 0.0);
    }
}
