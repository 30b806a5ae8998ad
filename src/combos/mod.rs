pub mod generator;
pub mod indices;

use serde::Serialize;

pub use generator::{ComboGenerator, GenerationOutcome, SourceCount};
pub use indices::{compositions, IndexCombinations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComboOrigin {
    Generated,
    Candidate,
}

/// An order-preserving run of 2 to 4 normalized keywords, identified by its
/// space-joined text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCombo {
    pub text: String,
    pub tokens: Vec<String>,
    pub origin: ComboOrigin,
}

impl GeneratedCombo {
    pub fn new(text: String, words: &[&str], origin: ComboOrigin) -> Self {
        Self {
            text,
            tokens: words.iter().map(|word| word.to_string()).collect(),
            origin,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
