use std::collections::HashMap;

use aso_combos::config::{AnalyzeOptions, EngineConfig};
use aso_combos::error::AnalyzeError;
use aso_combos::select::{compare, ComboFilter};
use aso_combos::signals::{PopularitySignal, RankingSignal, SignalSet, Trend};
use aso_combos::{analyze, Engine, Metadata, StrengthTier};

fn headspace() -> Metadata {
    Metadata {
        title: "Headspace: Meditation & Sleep".to_string(),
        subtitle: Some("Mindfulness Timer".to_string()),
        brand_name: Some("Headspace".to_string()),
        ..Metadata::default()
    }
}

fn wide_metadata() -> Metadata {
    Metadata {
        title: "Calm Meditation Sleep Sounds".to_string(),
        subtitle: Some("Focus Timer Rain".to_string()),
        keywords_field: Some(
            "relaxation,breathing,wellness,yoga,stress,anxiety,mood,journal,music,nature,zen,mindfulness"
                .to_string(),
        ),
        ..Metadata::default()
    }
}

#[test]
fn empty_title_is_a_validation_error() {
    let metadata = Metadata::new("  ");
    let err = analyze(&metadata, &SignalSet::default(), &AnalyzeOptions::default()).unwrap_err();
    assert_eq!(err, AnalyzeError::Validation("title is required".to_string()));
}

#[test]
fn title_and_subtitle_combos_are_tiered() {
    let report = analyze(&headspace(), &SignalSet::default(), &AnalyzeOptions::default()).unwrap();

    let find = |text: &str| report.combos.iter().find(|combo| combo.text() == text);
    assert_eq!(
        find("meditation sleep").map(|c| c.combo.tier),
        Some(StrengthTier::TitleConsecutive)
    );
    assert_eq!(
        find("meditation mindfulness").map(|c| c.combo.tier),
        Some(StrengthTier::TitleSubtitleCross)
    );
    assert!(report.combos.iter().all(|c| !c.text().contains("headspace")));
    assert!(!report.limit_reached);
    assert_eq!(report.total_generated, report.combos.len());

    // the strongest combo leads when no signals separate them
    assert_eq!(report.combos[0].text(), "meditation sleep");
}

#[test]
fn results_are_sorted_and_bounded() {
    let report = analyze(&wide_metadata(), &SignalSet::default(), &AnalyzeOptions::default()).unwrap();

    assert!(report.total_generated > 500);
    assert_eq!(report.combos.len(), 500);
    assert!(report.limit_reached);
    assert!(report.stats.truncated);
    assert!(report
        .combos
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != std::cmp::Ordering::Greater));

    for combo in &report.combos {
        assert!((2..=4).contains(&combo.combo.combo.len()));
        assert!(combo.priority.total <= 100);
        assert_eq!(combo.combo.exists, combo.combo.tier != StrengthTier::Missing);
    }
}

#[test]
fn stats_cover_the_full_generated_set() {
    let report = analyze(&wide_metadata(), &SignalSet::default(), &AnalyzeOptions::default()).unwrap();
    let stats = &report.stats;

    assert_eq!(stats.per_tier.len(), StrengthTier::ALL.len());
    assert_eq!(stats.per_tier.values().sum::<usize>(), stats.total_generated);
    assert_eq!(stats.existing + stats.missing, stats.total_generated);
    assert_eq!(stats.missing, 0);
    assert!((stats.coverage_percent - 100.0).abs() < 1e-6);
}

#[test]
fn options_override_top_n_and_caps() {
    let options = AnalyzeOptions {
        top_n: Some(3),
        max_combos_per_source: Some(4),
        weights: None,
    };
    let report = analyze(&wide_metadata(), &SignalSet::default(), &options).unwrap();

    assert_eq!(report.combos.len(), 3);
    assert!(report.limit_reached);
    assert!(report.stats.generation_capped);
}

#[test]
fn repeated_runs_serialize_identically() {
    let metadata = wide_metadata();
    let signals = SignalSet::new(
        HashMap::from([(
            "calm meditation".to_string(),
            RankingSignal {
                position: Some(8),
                total_results: Some(70),
                trend: Some(Trend::Up),
                position_change: Some(3),
            },
        )]),
        HashMap::from([(
            "sleep".to_string(),
            PopularitySignal {
                popularity_score: Some(72.0),
                intent_score: Some(0.6),
                autocomplete_score: None,
            },
        )]),
    );

    let first = analyze(&metadata, &signals, &AnalyzeOptions::default()).unwrap();
    let second = analyze(&metadata, &signals, &AnalyzeOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn high_priority_missing_candidate_yields_suggestion() {
    let mut metadata = headspace();
    metadata.candidate_combos = vec!["Rain Sounds".to_string()];
    let signals = SignalSet::new(
        HashMap::from([(
            "rain sounds".to_string(),
            RankingSignal {
                position: None,
                total_results: Some(10),
                trend: Some(Trend::Up),
                position_change: Some(15),
            },
        )]),
        HashMap::from([
            (
                "rain".to_string(),
                PopularitySignal {
                    popularity_score: Some(100.0),
                    intent_score: Some(1.0),
                    autocomplete_score: None,
                },
            ),
            (
                "sounds".to_string(),
                PopularitySignal {
                    popularity_score: Some(100.0),
                    intent_score: Some(1.0),
                    autocomplete_score: None,
                },
            ),
        ]),
    );

    let report = analyze(&metadata, &signals, &AnalyzeOptions::default()).unwrap();
    let candidate = report
        .combos
        .iter()
        .find(|combo| combo.text() == "rain sounds")
        .unwrap();

    assert_eq!(candidate.combo.tier, StrengthTier::Missing);
    assert_eq!(candidate.priority.total, 70);
    assert_eq!(report.stats.missing, 1);
    assert!(report
        .suggestions
        .contains(&"Add \"rain sounds\" to the title or subtitle (priority 70).".to_string()));
    assert!(report.suggestions.len() <= 10);

    let missing_only = ComboFilter {
        existence: Some(false),
        ..ComboFilter::default()
    };
    assert_eq!(missing_only.apply(&report.combos).len(), 1);
}

#[test]
fn fingerprint_tracks_metadata_and_config() {
    let metadata = headspace();
    let base = Engine::default();
    let first = base.analyze(&metadata, &SignalSet::default()).unwrap();
    let again = base.analyze(&metadata, &SignalSet::default()).unwrap();
    assert_eq!(first.fingerprint, again.fingerprint);
    assert_eq!(first.fingerprint.len(), 16);

    let mut config = EngineConfig::default();
    config.selection.top_n = 10;
    let tuned = Engine::new(config).analyze(&metadata, &SignalSet::default()).unwrap();
    assert_ne!(first.fingerprint, tuned.fingerprint);

    let mut other = metadata.clone();
    other.subtitle = Some("Focus Timer".to_string());
    let changed = base.analyze(&other, &SignalSet::default()).unwrap();
    assert_ne!(first.fingerprint, changed.fingerprint);
}

#[tokio::test]
async fn cooperative_run_matches_blocking_run() {
    let mut config = EngineConfig::default();
    config.chunk_size = 7;
    let engine = Engine::new(config);
    let metadata = wide_metadata();

    let blocking = engine.analyze(&metadata, &SignalSet::default()).unwrap();
    let cooperative = engine
        .analyze_cooperative(&metadata, &SignalSet::default())
        .await
        .unwrap();

    assert_eq!(blocking, cooperative);
}

#[tokio::test]
async fn cooperative_run_rejects_empty_title() {
    let engine = Engine::default();
    let result = engine
        .analyze_cooperative(&Metadata::default(), &SignalSet::default())
        .await;
    assert!(matches!(result, Err(AnalyzeError::Validation(_))));
}
