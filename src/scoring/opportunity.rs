use serde::{Deserialize, Serialize};

use crate::signals::RankingSignal;

/// Breakpoints and outputs for the opportunity component.
///
/// `total_results` is read as a competition index: below `low_competition`
/// is a blue ocean, below `medium_competition` is medium, anything else high.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpportunityConfig {
    /// Positions beyond this count as not ranking.
    pub ranked_cutoff: i64,
    pub top_rank: i64,
    pub headroom_rank: i64,
    pub uphill_rank: i64,
    pub low_competition: i64,
    pub medium_competition: i64,
    pub uphill_competition: i64,
    pub blue_ocean_score: f64,
    pub medium_competition_score: f64,
    pub high_competition_score: f64,
    pub top_rank_score: f64,
    pub headroom_score: f64,
    pub uphill_score: f64,
    pub neutral_score: f64,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            ranked_cutoff: 100,
            top_rank: 10,
            headroom_rank: 30,
            uphill_rank: 50,
            low_competition: 30,
            medium_competition: 60,
            uphill_competition: 80,
            blue_ocean_score: 100.0,
            medium_competition_score: 80.0,
            high_competition_score: 60.0,
            top_rank_score: 40.0,
            headroom_score: 70.0,
            uphill_score: 20.0,
            neutral_score: 50.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpportunityScorer {
    config: OpportunityConfig,
}

impl OpportunityScorer {
    pub fn new(config: OpportunityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, signal: Option<&RankingSignal>) -> f64 {
        let config = &self.config;
        let Some(signal) = signal else {
            return config.neutral_score;
        };

        let competition = signal.total_results.filter(|total| *total >= 0);
        match signal.position.filter(|position| *position > 0) {
            Some(position) if position <= config.ranked_cutoff => {
                if position <= config.top_rank {
                    config.top_rank_score
                } else if position <= config.headroom_rank {
                    config.headroom_score
                } else if position <= config.uphill_rank
                    && competition.is_some_and(|total| total > config.uphill_competition)
                {
                    config.uphill_score
                } else {
                    config.neutral_score
                }
            }
            _ => match competition {
                Some(total) if total < config.low_competition => config.blue_ocean_score,
                Some(total) if total < config.medium_competition => config.medium_competition_score,
                Some(_) => config.high_competition_score,
                None => config.neutral_score,
            },
        }
    }
}
