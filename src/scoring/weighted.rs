use serde::{Deserialize, Serialize};

use crate::scoring::ScoreComponents;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriorityWeights {
    pub strength: f64,
    pub popularity: f64,
    pub opportunity: f64,
    pub trend: f64,
    pub intent: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            strength: 0.30,
            popularity: 0.25,
            opportunity: 0.20,
            trend: 0.15,
            intent: 0.10,
        }
    }
}

impl PriorityWeights {
    fn sanitized(&self) -> [f64; 5] {
        [self.strength, self.popularity, self.opportunity, self.trend, self.intent]
            .map(|weight| if weight.is_finite() { weight.max(0.0) } else { 0.0 })
    }

    pub fn sum(&self) -> f64 {
        self.sanitized().iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: PriorityWeights,
}

impl WeightedScorer {
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    /// Weighted blend of the components, rounded into 0..=100. Weights that do
    /// not sum to one are renormalized.
    pub fn score(&self, components: &ScoreComponents) -> u8 {
        let weights = self.weights.sanitized();
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return 0;
        }

        let values = [
            components.strength,
            components.popularity,
            components.opportunity,
            components.trend,
            components.intent,
        ];

        let mut score = 0.0;
        for (weight, value) in weights.iter().zip(values) {
            score += weight * clamp100(value);
        }

        if (sum - 1.0).abs() > 1e-9 {
            score = self.normalize(score, sum);
        }

        score.round().clamp(0.0, 100.0) as u8
    }

    fn normalize(&self, score: f64, sum: f64) -> f64 {
        score / sum
    }
}

pub(crate) fn clamp100(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
