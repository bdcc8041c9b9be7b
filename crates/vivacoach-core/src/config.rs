use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vivacoach_schema::Locale;

use crate::session::{DEFAULT_PITCH_DURATION_SECS, MIN_TRANSCRIPT_CHARS};

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

/// Shared settings for the scoring and advisory endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_duration_secs() -> u32 {
    DEFAULT_PITCH_DURATION_SECS
}

fn default_min_transcript_chars() -> usize {
    MIN_TRANSCRIPT_CHARS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_min_transcript_chars")]
    pub min_transcript_chars: usize,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            min_transcript_chars: default_min_transcript_chars(),
        }
    }
}

fn default_context_messages() -> usize {
    crate::advisor::DEFAULT_CONTEXT_MESSAGES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            context_messages: default_context_messages(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub pitch: PitchConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub locale: Locale,
}

impl CoachConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config from {}", path.display()))
    }
}
