pub mod classify;
pub mod combos;
pub mod config;
pub mod error;
pub mod scoring;
pub mod select;
pub mod signals;
pub mod suggest;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::StrengthClassifier;
use crate::combos::{ComboGenerator, GeneratedCombo};
use crate::config::{AnalyzeOptions, EngineConfig};
use crate::error::AnalyzeError;
use crate::scoring::{ScoredCombo, ScoringPipeline};
use crate::select::{select_top, ComboStats};
use crate::signals::SignalSet;
use crate::suggest::build_suggestions;
use crate::tokenizer::{TokenizedMetadata, Tokenizer};

pub use crate::classify::{ClassifiedCombo, StrengthTier};
pub use crate::scoring::{DataQuality, PriorityScore};

/// A metadata field, declared in canonical text order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Subtitle,
    KeywordsField,
    PromoText,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Subtitle,
        Field::KeywordsField,
        Field::PromoText,
    ];

    pub fn index(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Subtitle => 1,
            Field::KeywordsField => 2,
            Field::PromoText => 3,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Field::Title => 1.0,
            Field::Subtitle => 0.5,
            Field::KeywordsField => 0.5,
            Field::PromoText => 0.3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::KeywordsField => "keywords field",
            Field::PromoText => "promotional text",
        }
    }
}

/// Snapshot of an app's store metadata. Only `title` is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub keywords_field: Option<String>,
    #[serde(default)]
    pub promo_text: Option<String>,
    /// One or more comma-separated brand names.
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Externally proposed combos classified alongside generated ones.
    #[serde(default)]
    pub candidate_combos: Vec<String>,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Subtitle => self.subtitle.as_deref().unwrap_or_default(),
            Field::KeywordsField => self.keywords_field.as_deref().unwrap_or_default(),
            Field::PromoText => self.promo_text.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub combos: Vec<ScoredCombo>,
    pub stats: ComboStats,
    pub total_generated: usize,
    pub limit_reached: bool,
    pub suggestions: Vec<String>,
    /// Stable digest of the metadata and effective config.
    pub fingerprint: String,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn analyze(
        &self,
        metadata: &Metadata,
        signals: &SignalSet,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let (tokenizer, tokenized) = self.tokenize(metadata)?;

        let mut generator = ComboGenerator::new(&tokenized, &self.config.generation);
        while generator.step() {}
        generator.add_candidates(&metadata.candidate_combos, &tokenizer);
        let outcome = generator.finish();

        let classifier = StrengthClassifier::new(&tokenized);
        let pipeline = ScoringPipeline::from_config(&self.config);
        let scored = score_batch(&outcome.combos, &classifier, &pipeline, signals);

        Ok(self.assemble(metadata, &tokenized, scored, outcome.capped))
    }

    /// Same result as [`Engine::analyze`], yielding to the runtime between
    /// generation units and between scoring chunks of `chunk_size` combos.
    pub async fn analyze_cooperative(
        &self,
        metadata: &Metadata,
        signals: &SignalSet,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let (tokenizer, tokenized) = self.tokenize(metadata)?;

        let mut generator = ComboGenerator::new(&tokenized, &self.config.generation);
        while generator.step() {
            tokio::task::yield_now().await;
        }
        generator.add_candidates(&metadata.candidate_combos, &tokenizer);
        let outcome = generator.finish();

        let classifier = StrengthClassifier::new(&tokenized);
        let pipeline = ScoringPipeline::from_config(&self.config);
        let mut scored = Vec::with_capacity(outcome.combos.len());
        for chunk in outcome.combos.chunks(self.config.chunk_size.max(1)) {
            scored.extend(score_batch(chunk, &classifier, &pipeline, signals));
            tokio::task::yield_now().await;
        }

        Ok(self.assemble(metadata, &tokenized, scored, outcome.capped))
    }

    fn tokenize(&self, metadata: &Metadata) -> Result<(Tokenizer, TokenizedMetadata), AnalyzeError> {
        let tokenizer = Tokenizer::new(&self.config.tokenizer, metadata.brand_name.as_deref());
        let tokenized = tokenizer.tokenize(metadata)?;
        debug!(
            tokens = tokenized.token_count(),
            brand_tokens = tokenized.brand_tokens().len(),
            "tokenized metadata"
        );
        Ok((tokenizer, tokenized))
    }

    fn assemble(
        &self,
        metadata: &Metadata,
        tokenized: &TokenizedMetadata,
        scored: Vec<ScoredCombo>,
        generation_capped: bool,
    ) -> AnalysisReport {
        let selection = select_top(scored, self.config.selection.top_n, generation_capped);
        let suggestions = build_suggestions(&selection.results, tokenized);

        info!(
            total_generated = selection.total_generated,
            returned = selection.results.len(),
            existing = selection.stats.existing,
            missing = selection.stats.missing,
            limit_reached = selection.limit_reached,
            "combo analysis complete"
        );

        AnalysisReport {
            combos: selection.results,
            stats: selection.stats,
            total_generated: selection.total_generated,
            limit_reached: selection.limit_reached,
            suggestions,
            fingerprint: input_fingerprint(metadata, &self.config),
        }
    }
}

/// Runs the engine with default config plus per-call `options`.
pub fn analyze(
    metadata: &Metadata,
    signals: &SignalSet,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport, AnalyzeError> {
    Engine::new(options.apply(&EngineConfig::default())).analyze(metadata, signals)
}

fn score_batch(
    combos: &[GeneratedCombo],
    classifier: &StrengthClassifier<'_>,
    pipeline: &ScoringPipeline,
    signals: &SignalSet,
) -> Vec<ScoredCombo> {
    combos
        .iter()
        .map(|combo| pipeline.score(classifier.classify(combo), signals))
        .collect()
}

pub fn input_fingerprint(metadata: &Metadata, config: &EngineConfig) -> String {
    let payload = serde_json::to_string(&(metadata, config)).unwrap_or_default();
    format!("{:016x}", stable_hash64(&payload))
}

fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
