//! Pull model from HuggingFace Hub

use std::path::PathBuf;

use anyhow::Result;
use hf_hub::api::sync::Api;

use crate::config;

/// Pull a GGUF file from HuggingFace Hub.
///
/// Without `--file`, the repo's GGUF files are listed instead so the user
/// can pick one; quantized repos typically carry a dozen variants.
pub async fn pull(repo: String, file: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let api = Api::new()?;
    let repo_api = api.model(repo.clone());

    let Some(filename) = file else {
        println!("GGUF files in {}:\n", repo);

        let info = repo_api.info()?;
        let mut ggufs: Vec<String> = info
            .siblings
            .into_iter()
            .map(|s| s.rfilename)
            .filter(|name| name.ends_with(".gguf"))
            .collect();
        ggufs.sort();

        if ggufs.is_empty() {
            println!("  No GGUF files in this repo.");
            return Ok(());
        }

        for name in &ggufs {
            println!("  {}", name);
        }
        println!("\nDownload one with:");
        println!("  sparkr pull {} --file <name>", repo);
        return Ok(());
    };

    let output_dir = output.unwrap_or_else(config::model_dir);
    std::fs::create_dir_all(&output_dir)?;

    println!("Downloading {} from {}", filename, repo);

    let cached = repo_api.get(&filename)?;
    let dest = output_dir.join(&filename);
    std::fs::copy(&cached, &dest)?;

    // Not every GGUF repo ships a tokenizer.json; a missing one is not an error.
    match repo_api.get("tokenizer.json") {
        Ok(tokenizer) => {
            if std::fs::copy(&tokenizer, output_dir.join("tokenizer.json")).is_ok() {
                println!("Downloaded: tokenizer.json");
            }
        }
        Err(e) => {
            tracing::debug!("No tokenizer.json in {}: {}", repo, e);
        }
    }

    println!("Downloaded to: {}", dest.display());

    Ok(())
}
