use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use aso_combos::combos::{ComboGenerator, ComboOrigin};
use aso_combos::config::GenerationConfig;
use aso_combos::tokenizer::{TokenizedMetadata, Tokenizer, TokenizerConfig};
use aso_combos::Metadata;

const VOCABULARY: &[&str] = &[
    "meditation", "sleep", "sounds", "calm", "focus", "breathing", "relaxation", "wellness",
    "timer", "yoga", "stress", "anxiety", "mood", "journal", "music", "nature", "rain", "zen",
];

fn tokenize(metadata: &Metadata) -> TokenizedMetadata {
    Tokenizer::new(&TokenizerConfig::default(), metadata.brand_name.as_deref())
        .tokenize(metadata)
        .unwrap()
}

fn texts(metadata: &Metadata, config: &GenerationConfig) -> Vec<String> {
    let tokenized = tokenize(metadata);
    ComboGenerator::new(&tokenized, config)
        .run()
        .combos
        .into_iter()
        .map(|combo| combo.text)
        .collect()
}

#[test]
fn single_field_generates_choose_k_not_permutations() {
    let metadata = Metadata::new("Meditation Timer Sleep Aid");
    let combos = texts(&metadata, &GenerationConfig::default());

    // C(4,2) + C(4,3) + C(4,4)
    assert_eq!(combos.len(), 6 + 4 + 1);
    assert!(combos.contains(&"meditation sleep".to_string()));
    assert!(combos.contains(&"meditation timer sleep aid".to_string()));
    assert!(!combos.contains(&"sleep meditation".to_string()));
}

#[test]
fn cross_field_combos_take_at_least_one_token_per_field() {
    let mut metadata = Metadata::new("Calm Meditation");
    metadata.subtitle = Some("Sleep Sounds".to_string());
    let combos = texts(&metadata, &GenerationConfig::default());

    // one per single field, then pairs: 4 of length 2, 4 of length 3, 1 of length 4
    assert_eq!(combos.len(), 1 + 1 + 4 + 4 + 1);
    assert!(combos.contains(&"meditation sleep".to_string()));
    assert!(combos.contains(&"calm meditation sleep".to_string()));
    assert!(combos.contains(&"meditation sleep sounds".to_string()));
    assert!(!combos.contains(&"sleep meditation".to_string()));
}

#[test]
fn shorter_combos_are_generated_first() {
    let mut metadata = Metadata::new("Calm Meditation");
    metadata.subtitle = Some("Sleep Sounds".to_string());
    let tokenized = tokenize(&metadata);
    let outcome = ComboGenerator::new(&tokenized, &GenerationConfig::default()).run();

    let lengths: Vec<usize> = outcome.combos.iter().map(|combo| combo.len()).collect();
    assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(outcome.combos[0].text, "calm meditation");
}

#[test]
fn brand_tokens_never_reach_combos() {
    let mut metadata = Metadata::new("Headspace: Meditation & Sleep");
    metadata.subtitle = Some("Mindfulness Timer".to_string());
    metadata.brand_name = Some("Headspace".to_string());
    let combos = texts(&metadata, &GenerationConfig::default());

    assert!(!combos.is_empty());
    assert!(combos.iter().all(|combo| !combo.contains("headspace")));
}

#[test]
fn repeated_words_do_not_form_combos_with_themselves() {
    let metadata = Metadata::new("Sleep Sounds Sleep");
    let combos = texts(&metadata, &GenerationConfig::default());

    assert_eq!(combos, vec!["sleep sounds".to_string(), "sounds sleep".to_string()]);
}

#[test]
fn long_runs_of_one_word_are_cheap() {
    let mut metadata = Metadata::new("Calm");
    metadata.keywords_field = Some("sleep ".repeat(240));
    let tokenized = tokenize(&metadata);

    let started = Instant::now();
    let outcome = ComboGenerator::new(&tokenized, &GenerationConfig::default()).run();

    let texts: Vec<&str> = outcome.combos.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["calm sleep"]);
    assert!(!outcome.capped);
    assert_eq!(outcome.examined, 1);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn repeated_words_are_visited_once_per_distinct_sequence() {
    let mut metadata = Metadata::new("Zen");
    metadata.keywords_field = Some("sleep sounds ".repeat(60));
    let tokenized = tokenize(&metadata);
    let outcome = ComboGenerator::new(&tokenized, &GenerationConfig::default()).run();

    let texts: Vec<&str> = outcome.combos.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "sleep sounds",
            "sounds sleep",
            "zen sleep",
            "zen sounds",
            "zen sleep sounds",
            "zen sounds sleep"
        ]
    );
    assert_eq!(outcome.examined, outcome.combos.len());
}

#[test]
fn per_source_cap_stops_deterministically() {
    let mut metadata = Metadata::new("Zen");
    metadata.keywords_field = Some(
        "relaxation,breathing,wellness,calm,focus,yoga,sleep,stress,anxiety,mood".to_string(),
    );
    let config = GenerationConfig {
        max_combos_per_source: 5,
        ..GenerationConfig::default()
    };
    let tokenized = tokenize(&metadata);
    let outcome = ComboGenerator::new(&tokenized, &config).run();

    assert!(outcome.capped);
    assert_eq!(outcome.combos.len(), 10);
    let first: Vec<&str> = outcome.combos[..5].iter().map(|c| c.text.as_str()).collect();
    assert_eq!(
        first,
        vec![
            "relaxation breathing",
            "relaxation wellness",
            "relaxation calm",
            "relaxation focus",
            "relaxation yoga"
        ]
    );
    assert!(outcome.sources.iter().all(|source| source.generated <= 5));
}

#[test]
fn global_cap_bounds_the_run() {
    let mut metadata = Metadata::new("Calm Meditation Sleep Sounds");
    metadata.subtitle = Some("Rain Nature Music".to_string());
    let config = GenerationConfig {
        max_total_combos: 7,
        ..GenerationConfig::default()
    };
    let tokenized = tokenize(&metadata);
    let outcome = ComboGenerator::new(&tokenized, &config).run();

    assert!(outcome.capped);
    assert_eq!(outcome.combos.len(), 7);
}

#[test]
fn uncapped_runs_report_no_cap() {
    let metadata = Metadata::new("Calm Meditation Sleep");
    let tokenized = tokenize(&metadata);
    let outcome = ComboGenerator::new(&tokenized, &GenerationConfig::default()).run();
    assert!(!outcome.capped);
}

#[test]
fn stepping_matches_a_single_run() {
    let mut metadata = Metadata::new("Calm Meditation Sleep Sounds");
    metadata.subtitle = Some("Rain Nature Music".to_string());
    metadata.keywords_field = Some("focus,yoga,stress,anxiety,journal".to_string());
    let config = GenerationConfig {
        max_combos_per_source: 40,
        max_total_combos: 150,
        ..GenerationConfig::default()
    };
    let tokenized = tokenize(&metadata);

    let whole = ComboGenerator::new(&tokenized, &config).run();

    let mut stepped = ComboGenerator::new(&tokenized, &config);
    let mut steps = 0;
    while stepped.step() {
        steps += 1;
    }
    let stepped = stepped.finish();

    assert!(steps > 1);
    assert_eq!(whole.combos, stepped.combos);
    assert_eq!(whole.capped, stepped.capped);
}

#[test]
fn candidates_are_normalized_filtered_and_deduplicated() {
    let metadata = Metadata::new("Calm Meditation");
    let tokenizer = Tokenizer::new(&TokenizerConfig::default(), Some("Headspace"));
    let tokenized = tokenizer.tokenize(&metadata).unwrap();

    let mut generator = ComboGenerator::new(&tokenized, &GenerationConfig::default());
    while generator.step() {}
    generator.add_candidates(
        &[
            "Sleep Sounds".to_string(),
            "sleep  sounds!".to_string(),
            "headspace sleep".to_string(),
            "calm meditation".to_string(),
            "sounds".to_string(),
            "music for the sleep".to_string(),
        ],
        &tokenizer,
    );
    let outcome = generator.finish();

    let candidates: Vec<&str> = outcome
        .combos
        .iter()
        .filter(|combo| combo.origin == ComboOrigin::Candidate)
        .map(|combo| combo.text.as_str())
        .collect();
    assert_eq!(candidates, vec!["sleep sounds", "music sleep"]);
    assert_eq!(outcome.combos.len(), 3);
}

#[test]
fn random_metadata_yields_unique_bounded_combos() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..40 {
        let mut pick = |count: usize| -> String {
            (0..count)
                .map(|_| *VOCABULARY.choose(&mut rng).unwrap())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let title = pick(4);
        let subtitle = pick(3);
        let keywords = pick(6).replace(' ', ",");
        let mut metadata = Metadata::new(title);
        metadata.subtitle = Some(subtitle);
        metadata.keywords_field = Some(keywords);

        let config = GenerationConfig {
            max_combos_per_source: rng.gen_range(10..200),
            ..GenerationConfig::default()
        };
        let tokenized = tokenize(&metadata);
        let outcome = ComboGenerator::new(&tokenized, &config).run();

        let mut seen = HashSet::new();
        for combo in &outcome.combos {
            assert!((2..=4).contains(&combo.len()), "bad length: {}", combo.text);
            assert_eq!(combo.text, combo.tokens.join(" "));
            assert!(seen.insert(combo.text.clone()), "duplicate: {}", combo.text);
        }
    }
}
