//! Field normalization and tokenization.
//!
//! Every field keeps two views of its text: `words`, the full normalized word
//! stream used for literal existence and adjacency checks, and `tokens`, the
//! subset eligible as combo inputs (stopwords, numerals and brand words removed).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::error::AnalyzeError;
use crate::{Field, Metadata};

const DEFAULT_STOPWORDS: &[&str] = &[
    // articles, conjunctions, prepositions, pronouns
    "a", "an", "the", "and", "or", "but", "nor", "of", "for", "to", "in", "on", "at", "by",
    "with", "from", "into", "onto", "as", "is", "are", "be", "it", "its", "this", "that",
    "these", "those", "your", "you", "my", "our", "me", "we", "vs", "via", "per",
    // app store noise
    "app", "apps", "application", "free", "best", "new", "top", "official", "download", "get",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenizerConfig {
    pub stopwords: Vec<String>,
    pub extra_stopwords: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|word| word.to_string()).collect(),
            extra_stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    /// Index into the owning field's `words`.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenizedField {
    pub words: Vec<String>,
    pub tokens: Vec<Token>,
}

impl TokenizedField {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TokenizedMetadata {
    fields: [TokenizedField; 4],
    brand_tokens: HashSet<String>,
}

impl TokenizedMetadata {
    pub fn field(&self, field: Field) -> &TokenizedField {
        &self.fields[field.index()]
    }

    pub fn brand_tokens(&self) -> &HashSet<String> {
        &self.brand_tokens
    }

    pub fn is_brand(&self, word: &str) -> bool {
        self.brand_tokens.contains(word)
    }

    pub fn token_count(&self) -> usize {
        self.fields.iter().map(|field| field.tokens.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
    brand_tokens: HashSet<String>,
}

impl Tokenizer {
    pub fn new(config: &TokenizerConfig, brand_name: Option<&str>) -> Self {
        let stopwords = config
            .stopwords
            .iter()
            .chain(config.extra_stopwords.iter())
            .flat_map(|word| normalize_words(word))
            .collect();

        Self {
            stopwords,
            brand_tokens: brand_name.map(brand_tokens).unwrap_or_default(),
        }
    }

    pub fn tokenize(&self, metadata: &Metadata) -> Result<TokenizedMetadata, AnalyzeError> {
        let fields = Field::ALL.map(|field| self.tokenize_text(metadata.field_text(field)));
        if fields[Field::Title.index()].words.is_empty() {
            return Err(AnalyzeError::Validation("title is required".to_string()));
        }

        Ok(TokenizedMetadata {
            fields,
            brand_tokens: self.brand_tokens.clone(),
        })
    }

    pub fn tokenize_text(&self, text: &str) -> TokenizedField {
        let words = normalize_words(text);
        let tokens = words
            .iter()
            .enumerate()
            .filter(|(_, word)| self.is_indexable(word))
            .map(|(position, word)| Token {
                text: word.clone(),
                position,
            })
            .collect();
        TokenizedField { words, tokens }
    }

    /// Whether a normalized word may take part in a generated combo.
    pub fn is_indexable(&self, word: &str) -> bool {
        !word.is_empty()
            && !self.stopwords.contains(word)
            && !self.brand_tokens.contains(word)
            && !is_numeral(word)
    }

    pub fn is_brand(&self, word: &str) -> bool {
        self.brand_tokens.contains(word)
    }
}

/// NFKC, lower-case, strip punctuation (keeping intra-word hyphens), split on
/// whitespace.
pub fn normalize_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.nfkc().flat_map(char::to_lowercase).collect();
    let mut cleaned = String::with_capacity(chars.len());

    for (idx, ch) in chars.iter().copied().enumerate() {
        if ch.is_alphanumeric() {
            cleaned.push(ch);
            continue;
        }
        match ch {
            '-' => {
                let prev = idx > 0 && chars[idx - 1].is_alphanumeric();
                let next = chars.get(idx + 1).is_some_and(|c| c.is_alphanumeric());
                cleaned.push(if prev && next { '-' } else { ' ' });
            }
            '\'' | '\u{2019}' => {}
            _ => cleaned.push(' '),
        }
    }

    cleaned.split_whitespace().map(str::to_string).collect()
}

pub fn normalize_phrase(text: &str) -> String {
    normalize_words(text).join(" ")
}

fn is_numeral(word: &str) -> bool {
    word.chars().all(|ch| ch.is_numeric())
}

fn brand_tokens(brand_name: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for name in brand_name.split(',') {
        let words = normalize_words(name);
        if words.len() > 1 {
            tokens.insert(words.concat());
        }
        tokens.extend(words);
    }
    tokens
}
