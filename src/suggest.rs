use std::collections::HashSet;

use crate::scoring::ScoredCombo;
use crate::tokenizer::{normalize_phrase, TokenizedMetadata};
use crate::Field;

const MAX_SUGGESTIONS: usize = 10;
const MISSING_PRIORITY_FLOOR: u8 = 60;
const ADJACENCY_POPULARITY_FLOOR: f64 = 70.0;

/// Human-readable hints derived from already ranked combos.
pub fn build_suggestions(ranked: &[ScoredCombo], metadata: &TokenizedMetadata) -> Vec<String> {
    let mut suggestions = Vec::new();

    if metadata.field(Field::Title).tokens.is_empty() {
        suggestions.push(
            "Title has no indexable keywords once brand and filler words are removed; add a descriptive keyword.".to_string(),
        );
    }

    for combo in ranked
        .iter()
        .filter(|combo| !combo.combo.exists && combo.priority.total >= MISSING_PRIORITY_FLOOR)
        .take(5)
    {
        suggestions.push(format!(
            "Add \"{}\" to the title or subtitle (priority {}).",
            combo.text(),
            combo.priority.total
        ));
    }

    for combo in ranked
        .iter()
        .filter(|combo| {
            combo.combo.tier.is_non_consecutive()
                && combo.priority.components.popularity >= ADJACENCY_POPULARITY_FLOOR
        })
        .take(3)
    {
        let field = combo
            .combo
            .source_fields
            .first()
            .map(|field| field.label())
            .unwrap_or("metadata");
        suggestions.push(format!(
            "Place \"{}\" as adjacent words in the {} to reach a consecutive tier.",
            combo.text(),
            field
        ));
    }

    let mut merged = Vec::new();
    merge_suggestions(&mut merged, &suggestions);
    merged
}

pub fn merge_suggestions(base: &mut Vec<String>, extras: &[String]) {
    let mut seen: HashSet<String> = base.iter().map(|s| normalize_phrase(s)).collect();
    for suggestion in extras {
        let normalized = normalize_phrase(suggestion);
        if normalized.is_empty() || seen.contains(&normalized) {
            continue;
        }
        base.push(suggestion.clone());
        seen.insert(normalized);
    }
    if base.len() > MAX_SUGGESTIONS {
        base.truncate(MAX_SUGGESTIONS);
    }
}
