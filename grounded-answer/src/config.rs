//! Pipeline configuration, loadable from a TOML file.

use grounded_embed::EmbedConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which answer strategy the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Deterministic intent templates (the default).
    Templated,
    /// Constrained generation with quote verification.
    Generative,
}

/// Settings for the external generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.2,
        }
    }
}

/// Top-level pipeline settings. Every field has a default, so a partial
/// TOML file (or none at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the index snapshot.
    pub index_dir: PathBuf,
    /// Evidence chunks retrieved per question.
    pub top_k: usize,
    /// Minimum best score required to answer.
    pub threshold: f32,
    pub mode: AnswerMode,
    /// Length cap applied to generated drafts.
    pub max_answer_chars: usize,
    pub embedding: EmbedConfig,
    pub generator: GeneratorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from(".grounded"),
            top_k: 4,
            threshold: 0.28,
            mode: AnswerMode::Templated,
            max_answer_chars: 1200,
            embedding: EmbedConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_mode(mut self, mode: AnswerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}
