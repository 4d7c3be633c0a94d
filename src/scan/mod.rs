//! Local GGUF model discovery
//!
//! Scans the well-known model caches (HuggingFace hub, LM Studio, plus an
//! optional `SPARKR_MODEL_DIR` directory) for `*.gguf` files and turns them
//! into transient [`ModelEntry`] records. Missing or unreadable directories
//! contribute nothing; discovery never fails.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// File extension that marks a model file.
pub const GGUF_EXTENSION: &str = "gguf";

/// Where a discovered model file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    HuggingFace,
    LmStudio,
    Local,
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModelSource::HuggingFace => "Hugging Face",
            ModelSource::LmStudio => "LM Studio",
            ModelSource::Local => "Local",
        };
        f.write_str(label)
    }
}

/// One discovered model file.
///
/// Informational only: built once during a scan, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    /// Absolute path to the `.gguf` file
    pub path: PathBuf,
    /// Human-readable model name (e.g. "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF")
    pub name: String,
    /// File name component of `path`
    pub filename: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Which cache the file was found in
    pub source: ModelSource,
}

impl ModelEntry {
    /// File size in gigabytes.
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }

    /// Size rendered the way listings show it, e.g. "4.1 GB".
    pub fn display_size(&self) -> String {
        format!("{:.1} GB", self.size_gb())
    }
}

/// HuggingFace hub cache directory (`~/.cache/huggingface/hub`).
pub fn hf_cache_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cache").join("huggingface").join("hub"))
}

/// LM Studio model directory (`~/.cache/lm-studio/models`).
pub fn lm_studio_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cache").join("lm-studio").join("models"))
}

/// Find all GGUF models across the known caches.
///
/// Best-effort: sources that do not exist are skipped silently. Entries are
/// sorted by path so repeated scans produce identical listings.
pub fn find_gguf_models() -> Vec<ModelEntry> {
    let mut models = Vec::new();

    if let Some(hub) = hf_cache_dir() {
        models.extend(scan_directory(&hub, ModelSource::HuggingFace));
    }

    if let Some(lm) = lm_studio_dir() {
        models.extend(scan_directory(&lm, ModelSource::LmStudio));
    }

    if let Ok(extra) = std::env::var(crate::config::MODEL_DIR_ENV) {
        models.extend(scan_directory(Path::new(&extra), ModelSource::Local));
    }

    models.sort_by(|a, b| a.path.cmp(&b.path));
    models
}

/// Scan one directory tree for `*.gguf` files.
///
/// Unreadable files and glob errors are dropped rather than reported.
pub fn scan_directory(root: &Path, source: ModelSource) -> Vec<ModelEntry> {
    if !root.is_dir() {
        return Vec::new();
    }

    let pattern = root
        .join("**")
        .join(format!("*.{}", GGUF_EXTENSION))
        .to_string_lossy()
        .into_owned();

    let mut entries: Vec<ModelEntry> = glob::glob(&pattern)
        .map(|paths| {
            paths
                .filter_map(|p| p.ok())
                .filter(|p| p.is_file())
                .filter_map(|path| entry_for(path, source))
                .collect()
        })
        .unwrap_or_default();

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

fn entry_for(path: PathBuf, source: ModelSource) -> Option<ModelEntry> {
    let size_bytes = std::fs::metadata(&path).ok()?.len();
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let name = match source {
        ModelSource::HuggingFace => hf_model_name(&path),
        ModelSource::LmStudio | ModelSource::Local => parent_dir_name(&path),
    };

    Some(ModelEntry {
        path,
        name,
        filename,
        size_bytes,
        source,
    })
}

/// Derive a repo-style name from a HuggingFace hub cache path.
///
/// Hub layout is `hub/models--Org--Name/snapshots/<rev>/<file>`; the
/// `models--Org--Name` ancestor maps back to "Org/Name". Files that are not
/// under such a directory fall back to the parent directory name.
fn hf_model_name(path: &Path) -> String {
    for ancestor in path.ancestors().skip(1) {
        if let Some(dir) = ancestor.file_name().and_then(|n| n.to_str()) {
            if let Some(stripped) = dir.strip_prefix("models--") {
                return stripped.replace("--", "/");
            }
        }
    }
    parent_dir_name(path)
}

fn parent_dir_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, bytes: usize) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn empty_directory_yields_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_directory(dir.path(), ModelSource::Local).is_empty());
    }

    #[test]
    fn missing_directory_yields_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        assert!(scan_directory(&gone, ModelSource::Local).is_empty());
    }

    #[test]
    fn finds_every_gguf_file_and_nothing_else() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/model-a.gguf"), 16);
        touch(&dir.path().join("b/nested/model-b.gguf"), 16);
        touch(&dir.path().join("b/readme.txt"), 4);
        touch(&dir.path().join("c/weights.safetensors"), 8);

        let entries = scan_directory(dir.path(), ModelSource::Local);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.filename.ends_with(".gguf")));
    }

    #[test]
    fn entries_are_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("z/last.gguf"), 1);
        touch(&dir.path().join("a/first.gguf"), 1);

        let entries = scan_directory(dir.path(), ModelSource::Local);
        assert_eq!(entries[0].filename, "first.gguf");
        assert_eq!(entries[1].filename, "last.gguf");
    }

    #[test]
    fn hf_cache_names_come_from_the_models_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("models--TheBloke--TinyLlama-1.1B-Chat-v1.0-GGUF")
            .join("snapshots")
            .join("abc123")
            .join("tinyllama-1.1b-chat-v1.0.Q4_0.gguf");
        touch(&file, 32);

        let entries = scan_directory(dir.path(), ModelSource::HuggingFace);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF");
        assert_eq!(entries[0].source, ModelSource::HuggingFace);
    }

    #[test]
    fn non_hub_layout_falls_back_to_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("mistral-7b/model.Q4_K_M.gguf"), 32);

        let entries = scan_directory(dir.path(), ModelSource::LmStudio);
        assert_eq!(entries[0].name, "mistral-7b");
    }

    #[test]
    fn size_is_recorded_and_rendered_in_gb() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("m/tiny.gguf"), 100);

        let entries = scan_directory(dir.path(), ModelSource::Local);
        assert_eq!(entries[0].size_bytes, 100);
        assert_eq!(entries[0].display_size(), "0.0 GB");
    }

    #[test]
    fn source_labels_match_the_listing_text() {
        assert_eq!(ModelSource::HuggingFace.to_string(), "Hugging Face");
        assert_eq!(ModelSource::LmStudio.to_string(), "LM Studio");
        assert_eq!(ModelSource::Local.to_string(), "Local");
    }
}
