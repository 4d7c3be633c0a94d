//! Configuration for sparkr
//!
//! Generation settings plus the model directory convention shared by the
//! `list`, `info` and `pull` commands.

mod generation;

pub use generation::GenerationConfig;

use std::path::PathBuf;

/// Environment variable naming an extra model directory.
pub const MODEL_DIR_ENV: &str = "SPARKR_MODEL_DIR";

/// Directory models are resolved from and pulled into.
///
/// `SPARKR_MODEL_DIR` when set, `./models` otherwise.
pub fn model_dir() -> PathBuf {
    std::env::var(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./models"))
}
