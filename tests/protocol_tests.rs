// Tests for protocol frame decoding and outbound frame shapes

use casebook::protocol::{decode_frame, ClientEvent, ServerEvent};

#[test]
fn decodes_session_configuration_acknowledged() {
    let event = decode_frame(r#"{"type":"session-configuration-acknowledged"}"#).unwrap();
    assert_eq!(event, Some(ServerEvent::SessionConfigurationAcknowledged));
}

#[test]
fn decodes_speech_deltas() {
    let event = decode_frame(r#"{"type":"assistant-speech-delta","delta":"Hello"}"#).unwrap();
    assert_eq!(
        event,
        Some(ServerEvent::AssistantSpeechDelta {
            delta: "Hello".to_string()
        })
    );

    let event = decode_frame(r#"{"type":"participant-speech-delta","delta":"Hi"}"#).unwrap();
    assert_eq!(
        event,
        Some(ServerEvent::ParticipantSpeechDelta {
            delta: "Hi".to_string()
        })
    );
}

#[test]
fn decodes_speech_finals() {
    let event =
        decode_frame(r#"{"type":"participant-speech-final","transcript":"goodbye"}"#).unwrap();
    assert_eq!(
        event,
        Some(ServerEvent::ParticipantSpeechFinal {
            transcript: "goodbye".to_string()
        })
    );

    let event =
        decode_frame(r#"{"type":"assistant-speech-final","transcript":"Hello there"}"#).unwrap();
    assert_eq!(
        event,
        Some(ServerEvent::AssistantSpeechFinal {
            transcript: "Hello there".to_string()
        })
    );
}

#[test]
fn decodes_end_of_turn() {
    let event = decode_frame(r#"{"type":"participant-speech-end-of-turn"}"#).unwrap();
    assert_eq!(event, Some(ServerEvent::ParticipantSpeechEndOfTurn));
}

#[test]
fn unknown_type_is_dropped_not_an_error() {
    let event = decode_frame(r#"{"type":"telemetry-ping","payload":42}"#).unwrap();
    assert_eq!(event, None);
}

#[test]
fn invalid_json_is_a_decode_error() {
    assert!(decode_frame("not json at all").is_err());
}

#[test]
fn missing_type_tag_is_a_decode_error() {
    assert!(decode_frame(r#"{"delta":"hello"}"#).is_err());
}

#[test]
fn known_type_with_bad_payload_is_a_decode_error() {
    // delta field missing entirely
    assert!(decode_frame(r#"{"type":"assistant-speech-delta"}"#).is_err());
}

#[test]
fn extra_fields_are_tolerated() {
    let event = decode_frame(
        r#"{"type":"participant-speech-final","transcript":"Hi","confidence":0.9}"#,
    )
    .unwrap();
    assert_eq!(
        event,
        Some(ServerEvent::ParticipantSpeechFinal {
            transcript: "Hi".to_string()
        })
    );
}

#[test]
fn session_configuration_serializes_with_kebab_case_fields() {
    let event = ClientEvent::SessionConfiguration {
        instructions: "Be warm".to_string(),
        voice: "coral".to_string(),
        modalities: vec!["audio".to_string(), "text".to_string()],
        transcription_model: "whisper-1".to_string(),
        turn_detection_mode: "server-vad".to_string(),
    };

    let json = event.to_frame().unwrap();
    assert!(json.contains("\"type\":\"session-configuration\""));
    assert!(json.contains("\"transcription-model\":\"whisper-1\""));
    assert!(json.contains("\"turn-detection-mode\":\"server-vad\""));
    assert!(json.contains("\"voice\":\"coral\""));
}

#[test]
fn speak_builds_a_response_create_frame() {
    let json = ClientEvent::speak("  Hello, thanks for joining.  ")
        .to_frame()
        .unwrap();

    assert!(json.contains("\"type\":\"response-create\""));
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("\"type\":\"input-text\""));
    // injected text is trimmed
    assert!(json.contains("\"text\":\"Hello, thanks for joining.\""));
}

#[test]
fn outbound_frames_round_trip() {
    let event = ClientEvent::speak("goodbye");
    let json = event.to_frame().unwrap();
    let back: ClientEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
