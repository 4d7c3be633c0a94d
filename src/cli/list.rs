//! List models command

use anyhow::Result;

use super::print_download_hints;
use crate::loader;
use crate::scan;

/// List GGUF models found in the local caches.
pub async fn list(verbose: bool, json: bool) -> Result<()> {
    let models = scan::find_gguf_models();

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    if models.is_empty() {
        println!("No GGUF models found locally.");
        print_download_hints();
        return Ok(());
    }

    println!("{} GGUF model(s) found locally:\n", models.len());

    for (i, model) in models.iter().enumerate() {
        println!("{:2}. {}", i + 1, model.name);
        println!("    File: {}", model.filename);
        println!("    Size: {}", model.display_size());
        println!("    Source: {}", model.source);
        println!("    Path: {}", model.path.display());

        if verbose {
            match loader::read_info(&model.path) {
                Ok(info) => {
                    println!("    Architecture: {}", info.architecture);
                    println!("    Quantization: {}", info.quantization);
                    if let Some(context) = info.context_length {
                        println!("    Max context: {}", context);
                    }
                }
                Err(e) => {
                    tracing::debug!("Skipping metadata for {}: {}", model.path.display(), e);
                }
            }
        }

        println!();
    }

    println!("To use one of these models:");
    println!("  sparkr chat");
    println!(
        "  sparkr generate --gguf \"{}\" --prompt \"Hello!\"",
        models[0].path.display()
    );

    Ok(())
}
