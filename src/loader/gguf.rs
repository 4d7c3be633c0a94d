//! GGUF metadata inspection
//!
//! Reads a file's header through the framework's GGUF reader. Only metadata
//! and tensor descriptors are touched, never the weights themselves.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use candle_core::quantized::gguf_file::{self, Value};
use candle_core::quantized::GgmlDType;

/// Summary of a GGUF file, assembled from its metadata.
#[derive(Debug, Clone)]
pub struct GgufInfo {
    pub architecture: String,
    pub vocab_size: Option<usize>,
    pub embedding_length: Option<usize>,
    pub block_count: Option<usize>,
    pub head_count: Option<usize>,
    pub head_count_kv: Option<usize>,
    pub context_length: Option<usize>,
    pub quantization: String,
    pub tensor_count: usize,
    pub file_size_bytes: Option<u64>,
}

/// Read metadata from a GGUF file without loading the model.
pub fn read_info<P: AsRef<Path>>(path: P) -> Result<GgufInfo> {
    let path = path.as_ref();

    let mut file = std::fs::File::open(path)
        .map_err(|e| anyhow!("Failed to open GGUF file {}: {}", path.display(), e))?;
    let content = gguf_file::Content::read(&mut file)
        .map_err(|e| anyhow!("Failed to read GGUF header: {}", e))?;

    let md = &content.metadata;
    let arch = metadata_str(md, "general.architecture").unwrap_or_else(|| "llama".to_string());

    Ok(GgufInfo {
        vocab_size: md
            .get("tokenizer.ggml.tokens")
            .and_then(|v| v.to_vec().ok())
            .map(|tokens| tokens.len()),
        embedding_length: metadata_uint(md, &format!("{}.embedding_length", arch)),
        block_count: metadata_uint(md, &format!("{}.block_count", arch)),
        head_count: metadata_uint(md, &format!("{}.attention.head_count", arch)),
        head_count_kv: metadata_uint(md, &format!("{}.attention.head_count_kv", arch)),
        context_length: metadata_uint(md, &format!("{}.context_length", arch)),
        quantization: dominant_dtype(content.tensor_infos.values().map(|t| t.ggml_dtype)),
        tensor_count: content.tensor_infos.len(),
        file_size_bytes: std::fs::metadata(path).map(|m| m.len()).ok(),
        architecture: arch,
    })
}

/// Look up a string metadata value.
fn metadata_str(md: &HashMap<String, Value>, key: &str) -> Option<String> {
    md.get(key).and_then(|v| v.to_string().ok()).cloned()
}

/// Look up an integer metadata value, whatever width the writer chose.
pub(crate) fn metadata_uint(md: &HashMap<String, Value>, key: &str) -> Option<usize> {
    match md.get(key)? {
        Value::U8(v) => Some(*v as usize),
        Value::U16(v) => Some(*v as usize),
        Value::U32(v) => Some(*v as usize),
        Value::U64(v) => Some(*v as usize),
        Value::I8(v) if *v >= 0 => Some(*v as usize),
        Value::I16(v) if *v >= 0 => Some(*v as usize),
        Value::I32(v) if *v >= 0 => Some(*v as usize),
        Value::I64(v) if *v >= 0 => Some(*v as usize),
        _ => None,
    }
}

/// Name the most common tensor dtype, e.g. "Q4K" for a Q4_K_M file.
fn dominant_dtype<I: Iterator<Item = GgmlDType>>(dtypes: I) -> String {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for dtype in dtypes {
        *counts.entry(format!("{:?}", dtype)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Render a byte count as GB or MB, matching the listing output.
pub fn format_size(bytes: u64) -> String {
    let size_mb = bytes as f64 / (1024.0 * 1024.0);
    if size_mb >= 1024.0 {
        format!("{:.2} GB", size_mb / 1024.0)
    } else {
        format!("{:.2} MB", size_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_dtype_picks_the_most_common_type() {
        let dtypes = vec![
            GgmlDType::Q4K,
            GgmlDType::Q4K,
            GgmlDType::Q6K,
            GgmlDType::F32,
            GgmlDType::Q4K,
        ];
        assert_eq!(dominant_dtype(dtypes.into_iter()), "Q4K");
    }

    #[test]
    fn dominant_dtype_of_nothing_is_unknown() {
        assert_eq!(dominant_dtype(std::iter::empty()), "Unknown");
    }

    #[test]
    fn sizes_render_in_mb_below_a_gigabyte() {
        assert_eq!(format_size(512 * 1024 * 1024), "512.00 MB");
        assert_eq!(format_size(4 * 1024 * 1024 * 1024), "4.00 GB");
    }

    #[test]
    fn integer_metadata_accepts_any_width() {
        let mut md = HashMap::new();
        md.insert("a".to_string(), Value::U32(4096));
        md.insert("b".to_string(), Value::U64(32));
        md.insert("c".to_string(), Value::I32(-1));
        md.insert("d".to_string(), Value::String("x".to_string()));

        assert_eq!(metadata_uint(&md, "a"), Some(4096));
        assert_eq!(metadata_uint(&md, "b"), Some(32));
        assert_eq!(metadata_uint(&md, "c"), None);
        assert_eq!(metadata_uint(&md, "d"), None);
        assert_eq!(metadata_uint(&md, "missing"), None);
    }
}
