use std::collections::HashSet;
use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::combos::indices::{compositions, IndexCombinations};
use crate::combos::{ComboOrigin, GeneratedCombo};
use crate::config::GenerationConfig;
use crate::tokenizer::{normalize_words, Token, TokenizedMetadata, Tokenizer};
use crate::Field;

/// One slice of the generation plan: a combo length, a source (one to three
/// fields in canonical order), and how many tokens each field contributes.
#[derive(Debug, Clone)]
struct WorkUnit {
    source: usize,
    parts: Vec<(Field, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Source,
    Global,
}

#[derive(Debug, Clone)]
pub struct SourceCount {
    pub fields: Vec<Field>,
    pub generated: usize,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub combos: Vec<GeneratedCombo>,
    pub capped: bool,
    /// Word sequences offered to the caps, accepted or not.
    pub examined: usize,
    pub sources: Vec<SourceCount>,
}

/// Resumable combo enumerator.
///
/// The plan is fixed at construction: lengths ascending, then sources (single
/// fields, pairs, triples, each in canonical field order), then token
/// distributions lexicographically, then index subsets lexicographically.
/// Within a field only the earliest occurrence of each distinct word sequence
/// is visited, so repeated words cost nothing beyond their first position.
/// Caps stop enumeration at the same point regardless of how many `step`
/// calls the caller spreads the work across.
#[derive(Debug)]
pub struct ComboGenerator<'a> {
    metadata: &'a TokenizedMetadata,
    config: GenerationConfig,
    sources: Vec<Vec<Field>>,
    plan: Vec<WorkUnit>,
    cursor: usize,
    per_source: Vec<usize>,
    seen: HashSet<String>,
    combos: Vec<GeneratedCombo>,
    capped: bool,
    examined: usize,
}

impl<'a> ComboGenerator<'a> {
    pub fn new(metadata: &'a TokenizedMetadata, config: &GenerationConfig) -> Self {
        let populated: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|field| !metadata.field(*field).tokens.is_empty())
            .collect();
        let sources = source_groups(&populated);

        let mut plan = Vec::new();
        for len in config.length_range() {
            for (source, fields) in sources.iter().enumerate() {
                for counts in compositions(len, fields.len()) {
                    let fits = fields
                        .iter()
                        .zip(counts.iter())
                        .all(|(field, count)| distinct_words(metadata, *field) >= *count);
                    if fits {
                        plan.push(WorkUnit {
                            source,
                            parts: fields.iter().copied().zip(counts).collect(),
                        });
                    }
                }
            }
        }

        Self {
            metadata,
            config: config.clone(),
            per_source: vec![0; sources.len()],
            sources,
            plan,
            cursor: 0,
            seen: HashSet::new(),
            combos: Vec::new(),
            capped: false,
            examined: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.plan.len()
    }

    /// Processes one work unit. Returns `true` while units remain.
    pub fn step(&mut self) -> bool {
        let Some(unit) = self.plan.get(self.cursor).cloned() else {
            return false;
        };
        self.cursor += 1;

        let metadata = self.metadata;
        let parts: Vec<(&[Token], usize)> = unit
            .parts
            .iter()
            .map(|(field, count)| (metadata.field(*field).tokens.as_slice(), *count))
            .collect();

        let mut buffer = Vec::with_capacity(parts.iter().map(|(_, count)| count).sum());
        let flow = walk(&parts, &mut buffer, &mut |words| self.accept(unit.source, words));
        if matches!(flow, ControlFlow::Break(Halt::Global)) {
            self.cursor = self.plan.len();
        }

        !self.is_done()
    }

    pub fn run(mut self) -> GenerationOutcome {
        while self.step() {}
        self.finish()
    }

    pub fn finish(self) -> GenerationOutcome {
        let sources: Vec<SourceCount> = self
            .sources
            .into_iter()
            .zip(self.per_source)
            .map(|(fields, generated)| SourceCount { fields, generated })
            .collect();

        for source in &sources {
            debug!(fields = ?source.fields, generated = source.generated, "combo source");
        }
        if self.capped {
            warn!(
                generated = self.combos.len(),
                per_source_cap = self.config.max_combos_per_source,
                total_cap = self.config.max_total_combos,
                "combo generation capped"
            );
        }

        debug!(examined = self.examined, accepted = self.combos.len(), "combo enumeration");

        GenerationOutcome {
            combos: self.combos,
            capped: self.capped,
            examined: self.examined,
            sources,
        }
    }

    /// Appends caller-proposed combos. They bypass the caps but are still
    /// normalized, brand-filtered and length-checked.
    pub fn add_candidates(&mut self, candidates: &[String], tokenizer: &Tokenizer) {
        let range = self.config.length_range();
        for candidate in candidates {
            let words = normalize_words(candidate);
            if words.iter().any(|word| tokenizer.is_brand(word)) {
                debug!(candidate = %candidate, "dropping branded candidate combo");
                continue;
            }
            let words: Vec<&str> = words
                .iter()
                .filter(|word| tokenizer.is_indexable(word))
                .map(String::as_str)
                .collect();
            if !range.contains(&words.len()) || has_repeats(&words) {
                continue;
            }
            let text = words.join(" ");
            if self.seen.insert(text.clone()) {
                self.combos.push(GeneratedCombo::new(text, &words, ComboOrigin::Candidate));
            }
        }
    }

    fn accept(&mut self, source: usize, words: &[&str]) -> ControlFlow<Halt> {
        self.examined += 1;
        let text = words.join(" ");
        if self.seen.contains(&text) {
            return ControlFlow::Continue(());
        }
        if self.combos.len() >= self.config.max_total_combos {
            self.capped = true;
            return ControlFlow::Break(Halt::Global);
        }
        if self.per_source[source] >= self.config.max_combos_per_source {
            self.capped = true;
            return ControlFlow::Break(Halt::Source);
        }

        self.per_source[source] += 1;
        self.seen.insert(text.clone());
        self.combos.push(GeneratedCombo::new(text, words, ComboOrigin::Generated));
        ControlFlow::Continue(())
    }
}

fn walk<'t>(
    parts: &[(&'t [Token], usize)],
    buffer: &mut Vec<&'t str>,
    emit: &mut dyn FnMut(&[&str]) -> ControlFlow<Halt>,
) -> ControlFlow<Halt> {
    let Some((&(tokens, count), rest)) = parts.split_first() else {
        return emit(buffer.as_slice());
    };
    pick(tokens, 0, count, rest, buffer, emit)
}

/// Chooses `remaining` more words from `tokens[from..]`, taking each distinct
/// word at its earliest position and never a word already in `buffer`. This
/// visits exactly the lexicographically smallest index subset of every
/// distinct repeat-free word sequence, in lexicographic order.
fn pick<'t>(
    tokens: &'t [Token],
    from: usize,
    remaining: usize,
    rest: &[(&'t [Token], usize)],
    buffer: &mut Vec<&'t str>,
    emit: &mut dyn FnMut(&[&str]) -> ControlFlow<Halt>,
) -> ControlFlow<Halt> {
    if remaining == 0 {
        return walk(rest, buffer, emit);
    }

    let mut tried: Vec<&str> = Vec::new();
    for idx in from..tokens.len() {
        if tokens.len() - idx < remaining {
            break;
        }
        let word = tokens[idx].text.as_str();
        if buffer.contains(&word) || tried.contains(&word) {
            continue;
        }
        tried.push(word);

        buffer.push(word);
        let flow = pick(tokens, idx + 1, remaining - 1, rest, buffer, emit);
        buffer.pop();
        if let ControlFlow::Break(halt) = flow {
            return ControlFlow::Break(halt);
        }
    }
    ControlFlow::Continue(())
}

fn distinct_words(metadata: &TokenizedMetadata, field: Field) -> usize {
    metadata
        .field(field)
        .tokens
        .iter()
        .map(|token| token.text.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn source_groups(fields: &[Field]) -> Vec<Vec<Field>> {
    let mut groups: Vec<Vec<Field>> = fields.iter().map(|field| vec![*field]).collect();
    for size in 2..=3 {
        for indices in IndexCombinations::new(fields.len(), size) {
            groups.push(indices.into_iter().map(|i| fields[i]).collect());
        }
    }
    groups
}

fn has_repeats(words: &[&str]) -> bool {
    words
        .iter()
        .enumerate()
        .any(|(i, word)| words[..i].contains(word))
}
