// Tests for transcript assembly
//
// These verify that streamed delta fragments accumulate into finalized
// utterances in arrival order, and that the transcript freezes correctly
// once a session terminates.

use casebook::{Speaker, TranscriptAssembler};

#[test]
fn deltas_concatenate_with_single_spaces() {
    let mut assembler = TranscriptAssembler::new();

    assembler.push_delta(Speaker::Participant, "I");
    assembler.push_delta(Speaker::Participant, "love");
    assembler.push_delta(Speaker::Participant, "this");
    let index = assembler.finalize(Speaker::Participant, "unused final text");

    assert_eq!(index, Some(0));
    let transcript = assembler.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.entries()[0].text, "I love this");
    assert_eq!(transcript.entries()[0].speaker, Speaker::Participant);
}

#[test]
fn finalize_without_deltas_uses_final_text() {
    let mut assembler = TranscriptAssembler::new();

    let index = assembler.finalize(Speaker::Assistant, "Hello there");

    assert_eq!(index, Some(0));
    assert_eq!(assembler.transcript().entries()[0].text, "Hello there");
    assert_eq!(assembler.transcript().entries()[0].speaker, Speaker::Assistant);
}

#[test]
fn empty_delta_is_a_no_op() {
    let mut assembler = TranscriptAssembler::new();

    assembler.push_delta(Speaker::Participant, "");
    assert_eq!(assembler.pending(Speaker::Participant), None);

    assembler.push_delta(Speaker::Participant, "hello");
    assembler.push_delta(Speaker::Participant, "");
    assert_eq!(assembler.pending(Speaker::Participant), Some("hello"));
}

#[test]
fn empty_finalize_appends_nothing() {
    let mut assembler = TranscriptAssembler::new();

    assert_eq!(assembler.finalize(Speaker::Participant, ""), None);
    assert_eq!(assembler.finalize(Speaker::Participant, "   "), None);
    assert!(assembler.transcript().is_empty());
}

#[test]
fn one_utterance_per_final_in_arrival_order() {
    let mut assembler = TranscriptAssembler::new();

    assembler.finalize(Speaker::Participant, "Hi");
    assembler.push_delta(Speaker::Assistant, "Hello");
    assembler.push_delta(Speaker::Assistant, "there");
    assembler.finalize(Speaker::Assistant, "");
    assembler.finalize(Speaker::Participant, "goodbye");

    let entries = assembler.transcript().entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text, "Hi");
    assert_eq!(entries[1].text, "Hello there");
    assert_eq!(entries[2].text, "goodbye");
    for (i, utterance) in entries.iter().enumerate() {
        assert_eq!(utterance.index, i);
    }
}

#[test]
fn buffers_are_per_speaker() {
    let mut assembler = TranscriptAssembler::new();

    assembler.push_delta(Speaker::Participant, "mine");
    assembler.push_delta(Speaker::Assistant, "theirs");

    assembler.finalize(Speaker::Participant, "");
    assert_eq!(assembler.transcript().entries()[0].text, "mine");
    assert_eq!(assembler.pending(Speaker::Assistant), Some("theirs"));
    assert_eq!(assembler.pending(Speaker::Participant), None);
}

#[test]
fn frozen_transcript_refuses_appends() {
    let mut assembler = TranscriptAssembler::new();
    assembler.finalize(Speaker::Participant, "Hi");

    assembler.freeze();
    assert!(assembler.transcript().is_frozen());

    assert_eq!(assembler.finalize(Speaker::Participant, "too late"), None);
    assert_eq!(assembler.transcript().len(), 1);
}

#[test]
fn freeze_discards_pending_fragments() {
    let mut assembler = TranscriptAssembler::new();
    assembler.push_delta(Speaker::Participant, "in progress");

    assembler.freeze();
    assert_eq!(assembler.pending(Speaker::Participant), None);
    assert!(assembler.transcript().is_empty());
}

#[test]
fn formatted_transcript_uses_uppercase_speaker_labels() {
    let mut assembler = TranscriptAssembler::new();
    assembler.finalize(Speaker::Participant, "Hi");
    assembler.finalize(Speaker::Assistant, "Hello there");

    assert_eq!(
        assembler.transcript().formatted(),
        "SELF: Hi\nASSISTANT: Hello there"
    );
}

#[test]
fn speaker_tags_serialize_as_self_and_assistant() {
    let mut assembler = TranscriptAssembler::new();
    assembler.finalize(Speaker::Participant, "Hi");

    let json = serde_json::to_string(&assembler.transcript().entries()[0]).unwrap();
    assert!(json.contains("\"speaker\":\"self\""));

    let mut assembler = TranscriptAssembler::new();
    assembler.finalize(Speaker::Assistant, "Hello");
    let json = serde_json::to_string(&assembler.transcript().entries()[0]).unwrap();
    assert!(json.contains("\"speaker\":\"assistant\""));
}
