// Tests for farewell detection
//
// The matcher is deliberately literal: lower-case, trim, and accept a
// configured phrase at word boundaries. False positives on benign sentences
// that contain a phrase are part of the contract.

use casebook::FarewellDetector;

#[test]
fn exact_phrase_matches() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("goodbye"));
}

#[test]
fn capitalization_and_trailing_period_match() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("Goodbye."));
}

#[test]
fn phrase_after_lead_in_matches() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("ok, goodbye!"));
}

#[test]
fn embedded_phrase_respects_word_boundary() {
    let detector = FarewellDetector::default();
    assert!(!detector.matches("goodbyeing"));
}

#[test]
fn phrase_surrounded_by_spaces_matches() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("I said goodbye to him"));
}

#[test]
fn all_default_phrases_match() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("see you"));
    assert!(detector.matches("talk to you later"));
    assert!(detector.matches("i have to go"));
}

#[test]
fn known_false_positive_is_preserved() {
    // "go get coffee" still matches "i have to go"; the heuristic is
    // boundary-based, not intent-based.
    let detector = FarewellDetector::default();
    assert!(detector.matches("I have to go get coffee first"));
}

#[test]
fn unrelated_text_does_not_match() {
    let detector = FarewellDetector::default();
    assert!(!detector.matches("hello there"));
    assert!(!detector.matches("the project went well"));
    assert!(!detector.matches(""));
}

#[test]
fn input_is_trimmed_and_lowercased() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("  GOODBYE  "));
    assert!(detector.matches("\tSee You\n"));
}

#[test]
fn custom_phrase_set_replaces_defaults() {
    let detector = FarewellDetector::new(vec!["Adios".to_string()]);
    assert!(detector.matches("adios"));
    assert!(detector.matches("well, adios!"));
    assert!(!detector.matches("goodbye"));
}

#[test]
fn punctuation_prefixes_match() {
    let detector = FarewellDetector::default();
    assert!(detector.matches("goodbye, everyone"));
    assert!(detector.matches("goodbye! and thanks"));
}
