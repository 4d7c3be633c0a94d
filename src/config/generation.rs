//! Generation configuration settings

use serde::{Deserialize, Serialize};

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Temperature for sampling (0 = greedy)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-p nucleus sampling threshold (None = disabled)
    #[serde(default)]
    pub top_p: Option<f32>,

    /// Repetition penalty (1.0 = no penalty)
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,

    /// How many recent tokens the repetition penalty looks at
    #[serde(default = "default_repeat_last_n")]
    pub repeat_last_n: usize,

    /// Random seed for the sampler
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_max_tokens() -> usize {
    150
}

fn default_temperature() -> f32 {
    0.1
}

fn default_repeat_penalty() -> f32 {
    1.0
}

fn default_repeat_last_n() -> usize {
    64
}

fn default_seed() -> u64 {
    42
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: None,
            repeat_penalty: default_repeat_penalty(),
            repeat_last_n: default_repeat_last_n(),
            seed: default_seed(),
        }
    }
}

impl GenerationConfig {
    /// Create a greedy decoding config (temperature = 0)
    pub fn greedy() -> Self {
        Self {
            temperature: 0.0,
            ..Default::default()
        }
    }

    /// Check if greedy decoding should be used
    pub fn is_greedy(&self) -> bool {
        self.temperature == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_chat_command() {
        let config = GenerationConfig::default();
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.seed, 42);
        assert!(config.top_p.is_none());
        assert!(!config.is_greedy());
    }

    #[test]
    fn zero_temperature_is_greedy() {
        assert!(GenerationConfig::greedy().is_greedy());
        let config = GenerationConfig {
            temperature: 0.7,
            ..Default::default()
        };
        assert!(!config.is_greedy());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: GenerationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.repeat_penalty, 1.0);
        assert_eq!(config.repeat_last_n, 64);
    }
}
