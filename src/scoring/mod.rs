pub mod opportunity;
pub mod pipeline;
pub mod trend;
pub mod weighted;

pub use opportunity::{OpportunityConfig, OpportunityScorer};
pub use pipeline::{
    DataQuality, PriorityScore, ScoreComponents, ScoredCombo, ScoringPipeline, SignalDefaults,
};
pub use trend::{TrendConfig, TrendScorer};
pub use weighted::{PriorityWeights, WeightedScorer};
