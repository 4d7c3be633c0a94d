//! Model resolution
//!
//! Turns the user's `--model`/`--gguf` argument into a path on disk: direct
//! paths win, then the model directory, then (when a repo is given) the
//! HuggingFace Hub cache via a download.

mod gguf;

pub use gguf::{format_size, read_info, GgufInfo};
pub(crate) use gguf::metadata_uint;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use hf_hub::api::sync::Api;

use crate::config;

/// Resolve a model argument to an existing file.
pub fn resolve_model(spec: &str) -> Result<PathBuf> {
    resolve_in_dir(spec, &config::model_dir())
        .ok_or_else(|| anyhow!("Model not found: {}", spec))
}

/// Resolve a model argument against a specific model directory.
fn resolve_in_dir(spec: &str, model_dir: &Path) -> Option<PathBuf> {
    let direct = PathBuf::from(spec);
    if direct.is_file() {
        return Some(direct);
    }

    let candidates = [
        model_dir.join(spec),
        model_dir.join(format!("{}.{}", spec, crate::scan::GGUF_EXTENSION)),
    ];
    candidates.into_iter().find(|c| c.is_file())
}

/// Resolve a model argument, downloading from `repo` when it is not local.
///
/// This is the `load(path, repo)` contract: a local file is used as-is, and
/// anything else is treated as a file name inside the HuggingFace repo.
pub fn resolve_or_fetch(spec: &str, repo: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = resolve_in_dir(spec, &config::model_dir()) {
        return Ok(path);
    }

    match repo {
        Some(repo) => fetch_from_hub(repo, spec),
        None => Err(anyhow!(
            "Model not found: {} (pass --repo to download it from HuggingFace)",
            spec
        )),
    }
}

/// Download one file from a HuggingFace repo into the hub cache.
pub fn fetch_from_hub(repo: &str, filename: &str) -> Result<PathBuf> {
    tracing::info!("Downloading {} from {}", filename, repo);

    let api = Api::new()?;
    let path = api.model(repo.to_string()).get(filename)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_paths_resolve_without_a_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("model.gguf");
        std::fs::write(&file, b"x").unwrap();

        let resolved = resolve_in_dir(file.to_str().unwrap(), Path::new("/nonexistent"));
        assert_eq!(resolved, Some(file));
    }

    #[test]
    fn names_resolve_inside_the_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.gguf"), b"x").unwrap();

        let resolved = resolve_in_dir("tiny.gguf", dir.path());
        assert_eq!(resolved, Some(dir.path().join("tiny.gguf")));
    }

    #[test]
    fn bare_names_get_the_gguf_suffix_appended() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.gguf"), b"x").unwrap();

        let resolved = resolve_in_dir("tiny", dir.path());
        assert_eq!(resolved, Some(dir.path().join("tiny.gguf")));
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_in_dir("missing", dir.path()).is_none());
    }
}
