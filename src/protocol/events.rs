use serde::{Deserialize, Serialize};

/// Inbound frame from the remote endpoint.
///
/// The `type` tag selects the variant; payload fields are `delta` for
/// in-progress fragments and `transcript` for finalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// The remote endpoint accepted the session configuration. The session
    /// goes live and the opening line is spoken.
    #[serde(rename = "session-configuration-acknowledged")]
    SessionConfigurationAcknowledged,

    /// A fragment of the assistant's in-progress speech transcript.
    #[serde(rename = "assistant-speech-delta")]
    AssistantSpeechDelta { delta: String },

    /// The assistant's utterance is complete.
    #[serde(rename = "assistant-speech-final")]
    AssistantSpeechFinal { transcript: String },

    /// A fragment of the participant's in-progress speech transcript.
    #[serde(rename = "participant-speech-delta")]
    ParticipantSpeechDelta { delta: String },

    /// The participant's utterance is complete. Termination policy is
    /// evaluated against it.
    #[serde(rename = "participant-speech-final")]
    ParticipantSpeechFinal { transcript: String },

    /// The participant stopped speaking. Informational only.
    #[serde(rename = "participant-speech-end-of-turn")]
    ParticipantSpeechEndOfTurn,
}

impl ServerEvent {
    /// Whether `tag` names a frame type this engine understands.
    pub fn is_known_type(tag: &str) -> bool {
        matches!(
            tag,
            "session-configuration-acknowledged"
                | "assistant-speech-delta"
                | "assistant-speech-final"
                | "participant-speech-delta"
                | "participant-speech-final"
                | "participant-speech-end-of-turn"
        )
    }
}

/// Outbound frame to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Configures the remote session: interviewer instructions, voice, and
    /// transcription behavior. Sent once, on entering `Negotiating`.
    #[serde(rename = "session-configuration")]
    SessionConfiguration {
        instructions: String,
        voice: String,
        modalities: Vec<String>,
        #[serde(rename = "transcription-model")]
        transcription_model: String,
        #[serde(rename = "turn-detection-mode")]
        turn_detection_mode: String,
    },

    /// Injects text for the remote endpoint to speak (opening line, closing
    /// remark).
    #[serde(rename = "response-create")]
    ResponseCreate {
        modalities: Vec<String>,
        input: Vec<InputMessage>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputContent {
    #[serde(rename = "input-text")]
    InputText { text: String },
}

impl ClientEvent {
    /// A `response-create` frame asking the remote endpoint to speak `text`.
    pub fn speak(text: &str) -> Self {
        ClientEvent::ResponseCreate {
            modalities: vec!["audio".to_string(), "text".to_string()],
            input: vec![InputMessage {
                role: "user".to_string(),
                content: vec![InputContent::InputText {
                    text: text.trim().to_string(),
                }],
            }],
        }
    }

    /// Serialize to the wire representation.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
