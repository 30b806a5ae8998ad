use serde::{Deserialize, Serialize};

use crate::signals::{RankingSignal, Trend};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendConfig {
    /// Position changes above this are strong moves.
    pub strong_change: i64,
    /// Position changes above this (and up to `strong_change`) are moderate.
    pub moderate_change: i64,
    pub strong_up_score: f64,
    pub moderate_up_score: f64,
    pub mild_up_score: f64,
    pub new_score: f64,
    pub stable_score: f64,
    pub mild_down_score: f64,
    pub strong_down_score: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            strong_change: 10,
            moderate_change: 5,
            strong_up_score: 100.0,
            moderate_up_score: 85.0,
            mild_up_score: 70.0,
            new_score: 80.0,
            stable_score: 50.0,
            mild_down_score: 35.0,
            strong_down_score: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendScorer {
    config: TrendConfig,
}

impl TrendScorer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, signal: Option<&RankingSignal>) -> f64 {
        let config = &self.config;
        let Some(signal) = signal else {
            return config.stable_score;
        };

        let change = signal.position_change;
        let magnitude = change.map(i64::unsigned_abs).unwrap_or(0);
        let direction = signal.trend.or_else(|| {
            change.map(|delta| match delta.signum() {
                1 => Trend::Up,
                -1 => Trend::Down,
                _ => Trend::Stable,
            })
        });

        match direction {
            None | Some(Trend::Stable) => config.stable_score,
            Some(Trend::New) => config.new_score,
            Some(Trend::Up) => {
                if magnitude > threshold(config.strong_change) {
                    config.strong_up_score
                } else if magnitude > threshold(config.moderate_change) {
                    config.moderate_up_score
                } else {
                    config.mild_up_score
                }
            }
            Some(Trend::Down) => {
                if magnitude > threshold(config.strong_change) {
                    config.strong_down_score
                } else {
                    config.mild_down_score
                }
            }
        }
    }
}

fn threshold(value: i64) -> u64 {
    value.max(0).unsigned_abs()
}
