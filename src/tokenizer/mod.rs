//! Tokenizer resolution
//!
//! The framework splits a GGUF model in two: candle owns the weights, the
//! `tokenizers` crate owns encode/decode. This module finds the right
//! `tokenizer.json` for a model file and wraps it with the EOS bookkeeping
//! generation needs.
//!
//! Resolution order: an explicit `--tokenizer` argument (file, directory, or
//! HuggingFace repo id), then a `tokenizer.json` beside the weights, then the
//! repo the weights came from.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::loader;

/// Token ids that commonly mark end-of-sequence, tried in order when the
/// GGUF metadata carries none.
const EOS_CANDIDATES: &[&str] = &["</s>", "<|endoftext|>", "<|im_end|>", "<|eot_id|>"];

/// Tokenizer wrapper for generation.
pub struct ChatTokenizer {
    inner: tokenizers::Tokenizer,
    eos_token_id: u32,
}

impl ChatTokenizer {
    /// Load a tokenizer file, with an EOS id hint from the model metadata.
    pub fn from_file<P: AsRef<Path>>(path: P, eos_hint: Option<u32>) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Failed to load tokenizer {}: {}", path.display(), e))?;

        let eos_token_id = match eos_hint {
            Some(id) => id,
            None => match EOS_CANDIDATES.iter().find_map(|t| inner.token_to_id(t)) {
                Some(id) => id,
                None => {
                    tracing::warn!("No EOS token found; generation will run to the token budget");
                    u32::MAX
                }
            },
        };

        Ok(Self {
            inner,
            eos_token_id,
        })
    }

    /// Encode text to token IDs
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Decode token IDs to text
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, true)
            .map_err(|e| anyhow!("Decode error: {}", e))
    }

    /// Check if a token is the EOS token
    pub fn is_eos(&self, token_id: u32) -> bool {
        token_id == self.eos_token_id
    }

    /// Get the EOS token ID
    pub fn eos_token_id(&self) -> u32 {
        self.eos_token_id
    }

    /// Get vocabulary size
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

/// Find the tokenizer for a model file.
pub fn resolve(
    model_path: &Path,
    explicit: Option<&str>,
    repo: Option<&str>,
    eos_hint: Option<u32>,
) -> Result<ChatTokenizer> {
    if let Some(spec) = explicit {
        let file = explicit_tokenizer_file(spec)?;
        return ChatTokenizer::from_file(file, eos_hint);
    }

    if let Some(file) = find_tokenizer_file(model_path) {
        tracing::debug!("Using tokenizer at {}", file.display());
        return ChatTokenizer::from_file(file, eos_hint);
    }

    if let Some(repo) = repo {
        let file = loader::fetch_from_hub(repo, "tokenizer.json")?;
        return ChatTokenizer::from_file(file, eos_hint);
    }

    Err(anyhow!(
        "No tokenizer.json found next to {}; pass --tokenizer <path-or-repo>",
        model_path.display()
    ))
}

/// Interpret an explicit `--tokenizer` argument.
fn explicit_tokenizer_file(spec: &str) -> Result<PathBuf> {
    let path = PathBuf::from(spec);
    if path.is_file() {
        return Ok(path);
    }
    if path.is_dir() {
        let candidate = path.join("tokenizer.json");
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(anyhow!("No tokenizer.json in {}", path.display()));
    }

    // Not a path: treat it as a HuggingFace repo id.
    loader::fetch_from_hub(spec, "tokenizer.json")
}

/// Look for a `tokenizer.json` beside the weights file.
fn find_tokenizer_file(model_path: &Path) -> Option<PathBuf> {
    let candidate = model_path.parent()?.join("tokenizer.json");
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_beside_the_weights_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.gguf");
        std::fs::write(&model, b"x").unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), b"{}").unwrap();

        assert_eq!(
            find_tokenizer_file(&model),
            Some(dir.path().join("tokenizer.json"))
        );
    }

    #[test]
    fn no_sibling_tokenizer_means_none() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.gguf");
        std::fs::write(&model, b"x").unwrap();

        assert!(find_tokenizer_file(&model).is_none());
    }

    #[test]
    fn explicit_directory_without_tokenizer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(explicit_tokenizer_file(dir.path().to_str().unwrap()).is_err());
    }
}
