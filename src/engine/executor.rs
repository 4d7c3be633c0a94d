//! Inference executor
//!
//! Loads a GGUF model through the framework and streams generated tokens.
//! Everything heavy lives on the framework side: candle decodes the
//! quantized weights and runs the forward passes, its `LogitsProcessor`
//! does the sampling, and the `tokenizers` crate handles text.

use std::path::Path;

use anyhow::{anyhow, Result};
use async_stream::stream;
use candle_core::quantized::gguf_file;
use candle_core::{Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::quantized_llama::ModelWeights;
use futures::Stream;

use crate::config::GenerationConfig;
use crate::loader::metadata_uint;
use crate::tokenizer::{self, ChatTokenizer};

/// Fallback context window when the GGUF metadata does not state one.
const DEFAULT_CONTEXT_LENGTH: usize = 4096;

/// A generated token with its decoded text fragment.
#[derive(Debug, Clone)]
pub struct GeneratedToken {
    /// Token ID
    pub token_id: u32,
    /// Newly decoded text (may be empty while a multi-byte char completes)
    pub text: String,
}

/// Inference executor
///
/// Owns the loaded model and the tokenizer, and exposes generation as a
/// stream of [`GeneratedToken`]s.
pub struct Executor {
    model: ModelWeights,
    tokenizer: ChatTokenizer,
    device: Device,
    context_length: usize,
}

impl Executor {
    /// Load a GGUF model and resolve its tokenizer.
    ///
    /// `tokenizer_spec` overrides tokenizer discovery; `repo` is consulted
    /// for a `tokenizer.json` when none is found beside the weights.
    pub fn load(
        model_path: &Path,
        tokenizer_spec: Option<&str>,
        repo: Option<&str>,
    ) -> Result<Self> {
        let start = std::time::Instant::now();
        tracing::info!("Loading model: {}", model_path.display());

        let mut file = std::fs::File::open(model_path)
            .map_err(|e| anyhow!("Failed to open GGUF file {}: {}", model_path.display(), e))?;
        let content = gguf_file::Content::read(&mut file)
            .map_err(|e| anyhow!("Failed to read GGUF header: {}", e))?;

        let metadata = &content.metadata;
        let arch = metadata
            .get("general.architecture")
            .and_then(|v| v.to_string().ok())
            .cloned()
            .unwrap_or_else(|| "llama".to_string());
        let context_length = metadata_uint(metadata, &format!("{}.context_length", arch))
            .unwrap_or(DEFAULT_CONTEXT_LENGTH);
        let eos_hint = metadata_uint(metadata, "tokenizer.ggml.eos_token_id").map(|v| v as u32);
        let tensor_count = content.tensor_infos.len();

        let device = Device::cuda_if_available(0)?;
        let model = ModelWeights::from_gguf(content, &mut file, &device)
            .map_err(|e| anyhow!("Failed to load GGUF tensors: {}", e))?;

        tracing::info!(
            "Loaded {} tensors in {:.1}s",
            tensor_count,
            start.elapsed().as_secs_f64()
        );

        let tokenizer = tokenizer::resolve(model_path, tokenizer_spec, repo, eos_hint)?;

        Ok(Self {
            model,
            tokenizer,
            device,
            context_length,
        })
    }

    /// Context window size of the loaded model.
    pub fn context_length(&self) -> usize {
        self.context_length
    }

    /// Number of tokens `text` encodes to.
    pub fn token_count(&self, text: &str) -> Result<usize> {
        Ok(self.tokenizer.encode(text)?.len())
    }

    /// Generate text from a prompt.
    ///
    /// Returns a stream of generated tokens; generation stops at EOS or once
    /// `max_tokens` (clamped to the remaining context window) is reached.
    pub fn generate<'a>(
        &'a mut self,
        prompt: &'a str,
        config: &'a GenerationConfig,
    ) -> impl Stream<Item = Result<GeneratedToken>> + 'a {
        stream! {
            let prompt_tokens = self.tokenizer.encode(prompt)?;
            if prompt_tokens.is_empty() {
                return;
            }

            let budget = config
                .max_tokens
                .min(self.context_length.saturating_sub(prompt_tokens.len()));

            let mut sampler = LogitsProcessor::new(
                config.seed,
                Some(config.temperature as f64),
                config.top_p.map(|p| p as f64),
            );

            // Prefill
            tracing::debug!("Prefilling {} prompt tokens", prompt_tokens.len());
            let input = Tensor::new(prompt_tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| anyhow!("Failed to build input tensor: {}", e))?;
            let mut logits = self
                .model
                .forward(&input, 0)
                .and_then(|l| l.squeeze(0))
                .map_err(|e| anyhow!("Forward pass failed: {}", e))?;

            let mut all_tokens: Vec<u32> = Vec::new();
            let mut emitted = 0usize;

            for index in 0..budget {
                let adjusted = if config.repeat_penalty == 1.0 {
                    logits.clone()
                } else {
                    let start_at = all_tokens.len().saturating_sub(config.repeat_last_n);
                    candle_transformers::utils::apply_repeat_penalty(
                        &logits,
                        config.repeat_penalty,
                        &all_tokens[start_at..],
                    )
                    .map_err(|e| anyhow!("Repeat penalty failed: {}", e))?
                };

                let next_token = sampler
                    .sample(&adjusted)
                    .map_err(|e| anyhow!("Sampling failed: {}", e))?;

                if self.tokenizer.is_eos(next_token) {
                    tracing::debug!("Hit EOS token, stopping generation");
                    break;
                }

                all_tokens.push(next_token);

                // Decode everything and emit the new suffix, holding back
                // bytes that are still mid-character.
                let decoded = self.tokenizer.decode(&all_tokens)?;
                let text = if decoded.len() > emitted && decoded.is_char_boundary(emitted) {
                    let fragment = decoded[emitted..].to_string();
                    emitted = decoded.len();
                    fragment
                } else {
                    String::new()
                };

                yield Ok(GeneratedToken {
                    token_id: next_token,
                    text,
                });

                let input = Tensor::new(&[next_token], &self.device)
                    .and_then(|t| t.unsqueeze(0))
                    .map_err(|e| anyhow!("Failed to build input tensor: {}", e))?;
                logits = self
                    .model
                    .forward(&input, prompt_tokens.len() + index)
                    .and_then(|l| l.squeeze(0))
                    .map_err(|e| anyhow!("Forward pass failed: {}", e))?;
            }

            tracing::debug!("Generation loop complete ({} tokens)", all_tokens.len());
        }
    }
}
