// Integration tests for the rule-based insight engine
//
// These tests pin down the detection semantics: substring matching,
// per-run deduplication, windowing, ordering, and summary counts.

use callsight::{InsightEngine, InsightKind, RuleCatalog, TranscriptSegment};

fn seg(text: &str, speaker: Option<&str>, timestamp: f64) -> TranscriptSegment {
    TranscriptSegment {
        text: text.to_string(),
        speaker: speaker.map(str::to_string),
        is_user: false,
        timestamp,
    }
}

fn engine() -> InsightEngine {
    InsightEngine::new(RuleCatalog::builtin(), 0)
}

#[test]
fn test_detects_objection_and_buying_signal() {
    let segments = vec![
        seg("This is too expensive for us", Some("SPEAKER_02"), 1.0),
        seg("Please send me a proposal", Some("SPEAKER_02"), 2.0),
    ];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.total_insights, 2);

    assert_eq!(result.insights[0].kind, InsightKind::PricingObjection);
    assert_eq!(result.insights[0].confidence, 0.9);
    assert_eq!(result.insights[0].timestamp, Some(1.0));
    assert_eq!(result.insights[0].matched_phrase, "too expensive");
    assert_eq!(result.insights[0].matched_text, "This is too expensive for us");

    assert_eq!(result.insights[1].kind, InsightKind::BuyingSignal);
    assert_eq!(result.insights[1].confidence, 0.95);
    assert_eq!(result.insights[1].timestamp, Some(2.0));

    assert_eq!(result.summary.get(&InsightKind::PricingObjection), Some(&1));
    assert_eq!(result.summary.get(&InsightKind::BuyingSignal), Some(&1));
    assert_eq!(result.summary.len(), 2);
}

#[test]
fn test_matching_is_case_insensitive() {
    let segments = vec![seg("TOO EXPENSIVE, frankly", None, 1.0)];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.total_insights, 1);
    assert_eq!(result.insights[0].kind, InsightKind::PricingObjection);
}

#[test]
fn test_empty_input_yields_empty_result() {
    let result = engine().analyze(&[], "s1");

    assert_eq!(result.total_insights, 0);
    assert!(result.insights.is_empty());
    assert!(result.summary.is_empty());
    assert_eq!(result.session_id, "s1");
}

#[test]
fn test_no_matches_yields_empty_result() {
    let segments = vec![seg("the weather is lovely today", Some("A"), 1.0)];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.total_insights, 0);
}

#[test]
fn test_same_phrase_at_two_timestamps_produces_two_insights() {
    let segments = vec![
        seg("that's too expensive", Some("A"), 1.0),
        seg("really, too expensive", Some("A"), 5.0),
    ];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.total_insights, 2);
    assert_eq!(result.summary.get(&InsightKind::PricingObjection), Some(&2));
}

#[test]
fn test_two_phrases_in_one_segment_produce_two_insights() {
    // "ready to move forward" also contains "move forward", so both rules fire
    let segments = vec![seg("we are ready to move forward", Some("A"), 3.0)];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.total_insights, 2);
    let phrases: Vec<&str> = result
        .insights
        .iter()
        .map(|i| i.matched_phrase.as_str())
        .collect();
    assert!(phrases.contains(&"ready to move forward"));
    assert!(phrases.contains(&"move forward"));

    // Equal timestamps: higher confidence sorts first
    assert!(result.insights[0].confidence >= result.insights[1].confidence);
}

#[test]
fn test_insights_sorted_by_timestamp_then_confidence() {
    let segments = vec![
        seg("send me a proposal", Some("A"), 10.0),
        seg("this is too expensive", Some("B"), 2.0),
    ];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.insights[0].timestamp, Some(2.0));
    assert_eq!(result.insights[1].timestamp, Some(10.0));
}

#[test]
fn test_analysis_is_deterministic() {
    let segments = vec![
        seg("we looked at a competitor and it looks good", Some("A"), 1.0),
        seg("let me think about it and get back to you", Some("B"), 2.0),
    ];

    let eng = engine();
    let first = eng.analyze(&segments, "s1");
    let second = eng.analyze(&segments, "s1");

    let a = serde_json::to_value(&first).unwrap();
    let b = serde_json::to_value(&second).unwrap();
    assert_eq!(a, b, "same input must produce identical output");
}

#[test]
fn test_window_limits_analysis_to_most_recent_segments() {
    let segments = vec![
        seg("this is too expensive", Some("A"), 1.0),
        seg("send me a proposal", Some("A"), 2.0),
        seg("I need to think about it", Some("A"), 3.0),
    ];

    let windowed = InsightEngine::new(RuleCatalog::builtin(), 1);
    let result = windowed.analyze(&segments, "s1");

    // Only the chronologically last segment is scanned
    assert_eq!(result.total_insights, 1);
    assert_eq!(result.insights[0].kind, InsightKind::StallTactic);
    assert_eq!(result.insights[0].timestamp, Some(3.0));
}

#[test]
fn test_window_larger_than_input_scans_everything() {
    let segments = vec![
        seg("this is too expensive", Some("A"), 1.0),
        seg("send me a proposal", Some("A"), 2.0),
    ];

    let windowed = InsightEngine::new(RuleCatalog::builtin(), 10);
    let result = windowed.analyze(&segments, "s1");

    assert_eq!(result.total_insights, 2);
}

#[test]
fn test_speaker_carried_onto_insight() {
    let segments = vec![seg("maybe next quarter", Some("SPEAKER_01"), 4.0)];

    let result = engine().analyze(&segments, "s1");

    assert_eq!(result.insights[0].speaker.as_deref(), Some("SPEAKER_01"));
    assert!(!result.insights[0].suggestion.is_empty());
}

#[test]
fn test_catalog_covers_all_five_categories() {
    let catalog = RuleCatalog::builtin();

    for kind in [
        InsightKind::PricingObjection,
        InsightKind::BuyingSignal,
        InsightKind::CompetitorMention,
        InsightKind::NextStep,
        InsightKind::StallTactic,
    ] {
        assert!(
            !catalog.rules_for(kind).is_empty(),
            "category {} must have rules",
            kind
        );
    }
    assert_eq!(catalog.rule_count(), 48);
}
