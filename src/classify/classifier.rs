use serde::Serialize;

use crate::classify::StrengthTier;
use crate::combos::GeneratedCombo;
use crate::tokenizer::TokenizedMetadata;
use crate::Field;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCombo {
    #[serde(flatten)]
    pub combo: GeneratedCombo,
    pub tier: StrengthTier,
    pub exists: bool,
    /// Fields used by the winning placement, canonical order.
    pub source_fields: Vec<Field>,
    /// Fields containing each token, regardless of order.
    pub token_fields: Vec<Vec<Field>>,
    /// Mean field weight over the winning placement; 0 when missing.
    pub field_weight: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FieldMask {
    title: bool,
    subtitle: bool,
    keywords: bool,
    promo: bool,
}

impl FieldMask {
    fn insert(&mut self, field: Field) {
        match field {
            Field::Title => self.title = true,
            Field::Subtitle => self.subtitle = true,
            Field::KeywordsField => self.keywords = true,
            Field::PromoText => self.promo = true,
        }
    }

    fn fields(self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| match field {
                Field::Title => self.title,
                Field::Subtitle => self.subtitle,
                Field::KeywordsField => self.keywords,
                Field::PromoText => self.promo,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Placement {
    tier: StrengthTier,
    mask: FieldMask,
    weight: f64,
}

/// Assigns every combo exactly one [`StrengthTier`].
///
/// A placement maps each token, in combo order, onto a field such that the
/// fields never go backwards in Title → Subtitle → Keywords → Promo order and
/// the tokens sharing a field appear in that field's word stream in order.
/// Every feasible placement is mapped to a tier and the strongest one wins;
/// equal scores fall back to declaration order. Placements touching promo
/// text are tracked but never produce a tier.
#[derive(Debug)]
pub struct StrengthClassifier<'a> {
    metadata: &'a TokenizedMetadata,
    patterns: Vec<Vec<Vec<Field>>>,
}

impl<'a> StrengthClassifier<'a> {
    pub fn new(metadata: &'a TokenizedMetadata) -> Self {
        let patterns = (0..=4).map(field_patterns).collect();
        Self { metadata, patterns }
    }

    pub fn classify(&self, combo: &GeneratedCombo) -> ClassifiedCombo {
        let words: Vec<&str> = combo.tokens.iter().map(String::as_str).collect();
        let token_fields = words
            .iter()
            .map(|word| {
                Field::ALL
                    .into_iter()
                    .filter(|field| self.metadata.field(*field).words.iter().any(|w| w == word))
                    .collect()
            })
            .collect();

        let (best, promo) = self.best_placement(&words);
        match best {
            Some(placement) => ClassifiedCombo {
                combo: combo.clone(),
                tier: placement.tier,
                exists: true,
                source_fields: placement.mask.fields(),
                token_fields,
                field_weight: placement.weight,
            },
            None => ClassifiedCombo {
                combo: combo.clone(),
                tier: StrengthTier::Missing,
                exists: false,
                source_fields: promo.map(FieldMask::fields).unwrap_or_default(),
                token_fields,
                field_weight: 0.0,
            },
        }
    }

    pub fn tier_of(&self, words: &[&str]) -> StrengthTier {
        self.best_placement(words)
            .0
            .map(|placement| placement.tier)
            .unwrap_or(StrengthTier::Missing)
    }

    fn best_placement(&self, words: &[&str]) -> (Option<Placement>, Option<FieldMask>) {
        let Some(patterns) = self.patterns.get(words.len()).filter(|_| words.len() >= 2) else {
            return (None, None);
        };

        let mut best: Option<Placement> = None;
        let mut promo: Option<FieldMask> = None;

        for pattern in patterns {
            if !self.feasible(pattern, words) {
                continue;
            }
            let mut mask = FieldMask::default();
            pattern.iter().for_each(|field| mask.insert(*field));

            let contiguous = match mask.fields().as_slice() {
                [single] => contains_run(&self.metadata.field(*single).words, words),
                _ => false,
            };
            let Some(tier) = tier_for(mask, contiguous) else {
                promo.get_or_insert(mask);
                continue;
            };

            if best.as_ref().map_or(true, |current| tier < current.tier) {
                let weight =
                    pattern.iter().map(|field| field.weight()).sum::<f64>() / pattern.len() as f64;
                best = Some(Placement { tier, mask, weight });
            }
        }

        (best, promo)
    }

    fn feasible(&self, pattern: &[Field], words: &[&str]) -> bool {
        let mut start = 0;
        while start < pattern.len() {
            let field = pattern[start];
            let end = pattern[start..]
                .iter()
                .position(|f| *f != field)
                .map_or(pattern.len(), |offset| start + offset);
            if !is_subsequence(&self.metadata.field(field).words, &words[start..end]) {
                return false;
            }
            start = end;
        }
        true
    }
}

fn tier_for(mask: FieldMask, contiguous: bool) -> Option<StrengthTier> {
    if mask.promo {
        return None;
    }
    let tier = match (mask.title, mask.subtitle, mask.keywords) {
        (true, false, false) if contiguous => StrengthTier::TitleConsecutive,
        (true, false, false) => StrengthTier::TitleNonConsecutive,
        (true, false, true) => StrengthTier::TitleKeywordsCross,
        (true, true, false) => StrengthTier::TitleSubtitleCross,
        (false, false, true) if contiguous => StrengthTier::KeywordsConsecutive,
        (false, true, false) if contiguous => StrengthTier::SubtitleConsecutive,
        (false, true, true) => StrengthTier::KeywordsSubtitleCross,
        (false, false, true) => StrengthTier::KeywordsNonConsecutive,
        (false, true, false) => StrengthTier::SubtitleNonConsecutive,
        (true, true, true) => StrengthTier::ThreeWayCross,
        (false, false, false) => return None,
    };
    Some(tier)
}

/// Non-decreasing field sequences of length `len`.
fn field_patterns(len: usize) -> Vec<Vec<Field>> {
    fn extend(len: usize, from: usize, current: &mut Vec<Field>, out: &mut Vec<Vec<Field>>) {
        if current.len() == len {
            out.push(current.clone());
            return;
        }
        for idx in from..Field::ALL.len() {
            current.push(Field::ALL[idx]);
            extend(len, idx, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if len > 0 {
        extend(len, 0, &mut Vec::with_capacity(len), &mut out);
    }
    out
}

fn is_subsequence(haystack: &[String], needle: &[&str]) -> bool {
    let mut remaining = haystack.iter();
    needle
        .iter()
        .all(|word| remaining.any(|candidate| candidate == word))
}

fn contains_run(haystack: &[String], needle: &[&str]) -> bool {
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window.iter().zip(needle).all(|(a, b)| a == b))
}
