use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedCombo;
use crate::config::EngineConfig;
use crate::scoring::weighted::clamp100;
use crate::scoring::{OpportunityScorer, TrendScorer, WeightedScorer};
use crate::signals::SignalSet;

/// Neutral values used when a token has no popularity entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalDefaults {
    pub popularity: f64,
    pub intent: f64,
}

impl Default for SignalDefaults {
    fn default() -> Self {
        Self {
            popularity: 50.0,
            intent: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Complete,
    Partial,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub strength: f64,
    pub popularity: f64,
    pub opportunity: f64,
    pub trend: f64,
    pub intent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    #[serde(flatten)]
    pub components: ScoreComponents,
    pub total: u8,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCombo {
    #[serde(flatten)]
    pub combo: ClassifiedCombo,
    pub priority: PriorityScore,
}

impl ScoredCombo {
    pub fn text(&self) -> &str {
        &self.combo.combo.text
    }

    pub fn total(&self) -> u8 {
        self.priority.total
    }
}

#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    weighted_scorer: WeightedScorer,
    opportunity_scorer: OpportunityScorer,
    trend_scorer: TrendScorer,
    defaults: SignalDefaults,
}

impl ScoringPipeline {
    pub fn new(
        weighted_scorer: WeightedScorer,
        opportunity_scorer: OpportunityScorer,
        trend_scorer: TrendScorer,
        defaults: SignalDefaults,
    ) -> Self {
        Self {
            weighted_scorer,
            opportunity_scorer,
            trend_scorer,
            defaults,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            WeightedScorer::new(config.weights.clone()),
            OpportunityScorer::new(config.opportunity.clone()),
            TrendScorer::new(config.trend.clone()),
            config.defaults.clone(),
        )
    }

    pub fn score(&self, combo: ClassifiedCombo, signals: &SignalSet) -> ScoredCombo {
        let ranking = signals.ranking(&combo.combo.text);

        let mut popularity_total = 0.0;
        let mut intent_total = 0.0;
        let mut popularity_found = false;
        for token in &combo.combo.tokens {
            let signal = signals.popularity(token);
            popularity_found |= signal.is_some();

            popularity_total += signal
                .and_then(|entry| finite(entry.popularity_score))
                .map(clamp100)
                .unwrap_or_else(|| clamp100(self.defaults.popularity));
            intent_total += signal
                .and_then(|entry| finite(entry.intent_score))
                .map(clamp01)
                .unwrap_or_else(|| clamp01(self.defaults.intent))
                * 100.0;
        }

        let token_count = combo.combo.tokens.len().max(1) as f64;
        let components = ScoreComponents {
            strength: f64::from(combo.tier.score()),
            popularity: popularity_total / token_count,
            opportunity: clamp100(self.opportunity_scorer.score(ranking)),
            trend: clamp100(self.trend_scorer.score(ranking)),
            intent: intent_total / token_count,
        };

        let data_quality = match (ranking.is_some(), popularity_found) {
            (true, true) => DataQuality::Complete,
            (false, false) => DataQuality::Estimated,
            _ => DataQuality::Partial,
        };

        ScoredCombo {
            combo,
            priority: PriorityScore {
                total: self.weighted_scorer.score(&components),
                components,
                data_quality,
            },
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
