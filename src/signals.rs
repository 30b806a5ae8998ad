//! Pre-fetched ranking and popularity signals.
//!
//! The engine never fetches these itself. Callers hand over completed maps;
//! when loading from JSON, malformed entries are skipped one at a time so a
//! bad record only costs that combo its signal.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::error::SignalError;
use crate::tokenizer::normalize_phrase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
    New,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSignal {
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub total_results: Option<i64>,
    #[serde(default)]
    pub trend: Option<Trend>,
    /// Positions gained since the previous snapshot; negative means lost.
    #[serde(default)]
    pub position_change: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularitySignal {
    #[serde(default)]
    pub popularity_score: Option<f64>,
    #[serde(default)]
    pub intent_score: Option<f64>,
    #[serde(default)]
    pub autocomplete_score: Option<f64>,
}

/// Rankings keyed by combo text and popularity keyed by token, both with
/// normalized keys. Deserializing goes through [`SignalSet::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct SignalSet {
    rankings: HashMap<String, RankingSignal>,
    popularity: HashMap<String, PopularitySignal>,
}

impl SignalSet {
    pub fn new(
        rankings: HashMap<String, RankingSignal>,
        popularity: HashMap<String, PopularitySignal>,
    ) -> Self {
        Self {
            rankings: normalize_keys(rankings),
            popularity: normalize_keys(popularity),
        }
    }

    pub fn ranking(&self, combo_text: &str) -> Option<&RankingSignal> {
        self.rankings.get(combo_text)
    }

    pub fn popularity(&self, token: &str) -> Option<&PopularitySignal> {
        self.popularity.get(token)
    }

    pub fn ranking_count(&self) -> usize {
        self.rankings.len()
    }

    pub fn popularity_count(&self) -> usize {
        self.popularity.len()
    }

    pub fn load(path: &Path) -> Result<Self, SignalError> {
        let contents = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        Self::from_json(value)
    }

    /// Builds a signal set from loosely-typed JSON, dropping entries that do
    /// not deserialize.
    pub fn from_json(value: serde_json::Value) -> Result<Self, SignalError> {
        let serde_json::Value::Object(mut root) = value else {
            return Err(SignalError::Shape);
        };

        let rankings = lenient_map::<RankingSignal>(root.remove("rankings"), "rankings")?;
        let popularity = lenient_map::<PopularitySignal>(root.remove("popularity"), "popularity")?;
        Ok(Self::new(rankings, popularity))
    }
}

impl TryFrom<serde_json::Value> for SignalSet {
    type Error = SignalError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

fn lenient_map<T>(
    value: Option<serde_json::Value>,
    section: &str,
) -> Result<HashMap<String, T>, SignalError>
where
    T: for<'de> Deserialize<'de>,
{
    let entries = match value {
        None | Some(serde_json::Value::Null) => return Ok(HashMap::new()),
        Some(serde_json::Value::Object(entries)) => entries,
        Some(_) => return Err(SignalError::Shape),
    };

    let mut out = HashMap::with_capacity(entries.len());
    for (key, entry) in entries {
        match serde_json::from_value::<T>(entry) {
            Ok(parsed) => {
                out.insert(key, parsed);
            }
            Err(err) => {
                warn!(section, key = %key, error = %err, "skipping malformed signal entry");
            }
        }
    }
    Ok(out)
}

fn normalize_keys<T>(map: HashMap<String, T>) -> HashMap<String, T> {
    let mut entries: Vec<(String, T)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        let normalized = normalize_phrase(&key);
        if normalized.is_empty() {
            continue;
        }
        out.entry(normalized).or_insert(value);
    }
    out
}
