//! Quick-start command: first cached model straight into chat

use anyhow::Result;

use super::print_download_hints;
use crate::scan::{self, ModelSource};

/// Temperature the quick-start chat runs with.
const QUICK_TEMP: f32 = 0.1;

/// Start a chat with the first GGUF model in the HuggingFace cache.
pub async fn quick() -> Result<()> {
    let Some(hub) = scan::hf_cache_dir() else {
        println!("No home directory found; nothing to scan.");
        return Ok(());
    };

    let models = scan::scan_directory(&hub, ModelSource::HuggingFace);
    let Some(first) = models.first() else {
        println!("No GGUF models found in the HuggingFace cache.");
        print_download_hints();
        return Ok(());
    };

    println!("Quick start with {}", first.filename);
    println!("{}", "=".repeat(50));

    super::chat(Some(first.path.clone()), None, QUICK_TEMP, 150, 42).await
}
