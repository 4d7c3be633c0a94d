//! Model info command

use anyhow::Result;

use crate::loader;

/// Show GGUF metadata for a model.
pub async fn info(model: String) -> Result<()> {
    let model_path = loader::resolve_model(&model)?;

    println!("Model: {}\n", model);
    println!("Path: {}", model_path.display());
    println!("Format: GGUF\n");

    let info = loader::read_info(&model_path)?;

    println!("Configuration:");
    println!("  Architecture: {}", info.architecture);

    if let Some(vocab_size) = info.vocab_size {
        println!("  Vocab size: {}", vocab_size);
    }
    if let Some(embedding_length) = info.embedding_length {
        println!("  Hidden size: {}", embedding_length);
    }
    if let Some(block_count) = info.block_count {
        println!("  Layers: {}", block_count);
    }
    if let Some(head_count) = info.head_count {
        println!("  Attention heads: {}", head_count);
    }
    if let Some(head_count_kv) = info.head_count_kv {
        println!("  KV heads: {}", head_count_kv);
    }
    if let Some(context_length) = info.context_length {
        println!("  Max context: {}", context_length);
    }

    println!("\nQuantization: {}", info.quantization);
    println!("Tensors: {}", info.tensor_count);

    if let Some(size) = info.file_size_bytes {
        println!("File size: {}", loader::format_size(size));
    }

    Ok(())
}
