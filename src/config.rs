use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scoring::{OpportunityConfig, PriorityWeights, SignalDefaults, TrendConfig};
use crate::tokenizer::TokenizerConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_combos_per_source: usize,
    pub max_total_combos: usize,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_combos_per_source: 1500,
            max_total_combos: 10_000,
            min_len: 2,
            max_len: 4,
        }
    }
}

impl GenerationConfig {
    /// Combo length bounds clamped to the supported 2..=4 window.
    pub fn length_range(&self) -> std::ops::RangeInclusive<usize> {
        let min = self.min_len.clamp(2, 4);
        let max = self.max_len.clamp(min, 4);
        min..=max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    pub top_n: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { top_n: 500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Combos scored between yields in cooperative runs.
    pub chunk_size: usize,
    pub generation: GenerationConfig,
    pub selection: SelectionConfig,
    pub weights: PriorityWeights,
    pub opportunity: OpportunityConfig,
    pub trend: TrendConfig,
    pub defaults: SignalDefaults,
    pub tokenizer: TokenizerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 256,
            generation: GenerationConfig::default(),
            selection: SelectionConfig::default(),
            weights: PriorityWeights::default(),
            opportunity: OpportunityConfig::default(),
            trend: TrendConfig::default(),
            defaults: SignalDefaults::default(),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
                toml::from_str(&contents)?
            }
            _ => EngineConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
            }
        }
        let payload = toml::to_string_pretty(self)?;
        std::fs::write(path, payload).map_err(ConfigError::Write)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_parse::<usize>("ASO_TOP_N") {
            self.selection.top_n = value;
        }
        if let Some(value) = env_parse::<usize>("ASO_MAX_COMBOS_PER_SOURCE") {
            self.generation.max_combos_per_source = value;
        }
        if let Some(value) = env_parse::<usize>("ASO_MAX_TOTAL_COMBOS") {
            self.generation.max_total_combos = value;
        }
        if let Some(value) = env_parse::<usize>("ASO_CHUNK_SIZE") {
            self.chunk_size = value;
        }
    }
}

/// Per-call overrides layered on top of an [`EngineConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    pub max_combos_per_source: Option<usize>,
    pub top_n: Option<usize>,
    pub weights: Option<PriorityWeights>,
}

impl AnalyzeOptions {
    pub fn apply(&self, config: &EngineConfig) -> EngineConfig {
        let mut config = config.clone();
        if let Some(value) = self.max_combos_per_source {
            config.generation.max_combos_per_source = value;
        }
        if let Some(value) = self.top_n {
            config.selection.top_n = value;
        }
        if let Some(weights) = self.weights.as_ref() {
            config.weights = weights.clone();
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ASO_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}
