use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::farewell::FarewellDetector;
use crate::pipeline::{EntityNames, StageInput, StageKind, StageSpec};

/// Which side of the case study the participant speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantRole {
    /// The user giving feedback about the tool itself.
    #[serde(rename = "self")]
    SelfFeedback,
    /// The solution provider telling the story.
    #[serde(rename = "provider")]
    Provider,
    /// The counterpart client adding their side.
    #[serde(rename = "client")]
    Client,
}

impl ParticipantRole {
    pub fn name(&self) -> &'static str {
        match self {
            ParticipantRole::SelfFeedback => "self",
            ParticipantRole::Provider => "provider",
            ParticipantRole::Client => "client",
        }
    }
}

/// Interviewer prompt as structured data: a persona, an ordered conversation
/// flow, and the entity names already known for this session. Rendering
/// stitches these into the instruction text; the engine itself never
/// interpolates ad hoc strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub persona: String,
    pub flow: Vec<String>,
    pub known_names: Option<EntityNames>,
}

impl PromptConfig {
    /// Render the instruction text sent in the session-configuration frame.
    pub fn render(&self) -> String {
        let mut sections = vec![self.persona.clone()];
        for (i, step) in self.flow.iter().enumerate() {
            sections.push(format!("{}. {}", i + 1, step));
        }
        if let Some(names) = &self.known_names {
            sections.push(format!(
                "Known context: the solution provider is {}, the client is {}, the project is \"{}\". \
                 Use these names directly instead of generic placeholders.",
                names.lead_entity, names.partner_entity, names.project_title
            ));
        }
        sections.join("\n")
    }
}

/// Everything that distinguishes one interview variant from another. The
/// engine is identical across variants; only this configuration changes.
#[derive(Debug, Clone)]
pub struct SessionProfile {
    pub role: ParticipantRole,
    pub prompt: PromptConfig,
    pub opening_line: String,
    /// Spoken to the remote endpoint on a farewell match before teardown.
    pub closing_remark: Option<String>,
    /// How long the closing remark is given to play out.
    pub farewell_grace: Duration,
    /// Maximum session duration; the deadline timer is armed with this on
    /// `Active` entry.
    pub max_duration: Duration,
    pub farewell: FarewellDetector,
    pub voice: String,
    pub transcription_model: String,
    pub turn_detection_mode: String,
    /// Ordered post-session stage plan.
    pub stages: Vec<StageSpec>,
}

impl SessionProfile {
    /// General feedback collection: short budget, transcript persisted, no
    /// summarization.
    pub fn feedback() -> Self {
        Self {
            role: ParticipantRole::SelfFeedback,
            prompt: PromptConfig {
                persona: "You are a warm, professional feedback collector for a case-study \
                          tool. Keep the conversation brief and focused."
                    .to_string(),
                flow: vec![
                    "Greet the user and explain you are gathering feedback about their \
                     experience."
                        .to_string(),
                    "Ask about their overall experience and the features they used most."
                        .to_string(),
                    "Ask what could be improved and for an overall rating.".to_string(),
                    "Thank them and let them end the conversation naturally.".to_string(),
                ],
                known_names: None,
            },
            opening_line: "Hi! I'd like to share my feedback.".to_string(),
            closing_remark: None,
            farewell_grace: Duration::ZERO,
            max_duration: Duration::from_secs(180),
            farewell: FarewellDetector::default(),
            voice: "coral".to_string(),
            transcription_model: "whisper-1".to_string(),
            turn_detection_mode: "server-vad".to_string(),
            stages: vec![StageSpec::new(
                StageKind::PersistTranscript,
                StageInput::Transcript,
            )],
        }
    }

    /// Solution-provider interview: the full story-gathering flow, then a
    /// follow-up interview is provisioned for the counterpart.
    pub fn provider() -> Self {
        Self {
            role: ParticipantRole::Provider,
            prompt: PromptConfig {
                persona: "You are an emotionally intelligent, curious AI interviewer who \
                          behaves like a human podcast host. Casual, conversational, \
                          professional."
                    .to_string(),
                flow: vec![
                    "Greet the participant, introduce yourself, and ask which language they \
                     prefer."
                        .to_string(),
                    "Collect their name, company, role, the client the work was for, and the \
                     project name, one at a time."
                        .to_string(),
                    "Walk through the client context, the challenge, the solution, the \
                     implementation, and the measurable results."
                        .to_string(),
                    "Ask what the project meant to them and collect a quote.".to_string(),
                    "Explain that the client will be invited to add their side, then wrap up \
                     warmly."
                        .to_string(),
                ],
                known_names: None,
            },
            opening_line: "Hello, this is your AI case-study interviewer. Thanks for joining \
                           me today."
                .to_string(),
            closing_remark: Some(
                "Thank you for the conversation! Wishing you a great day ahead. Goodbye!"
                    .to_string(),
            ),
            farewell_grace: Duration::from_millis(4200),
            max_duration: Duration::from_secs(600),
            farewell: FarewellDetector::default(),
            voice: "coral".to_string(),
            transcription_model: "whisper-1".to_string(),
            turn_detection_mode: "server-vad".to_string(),
            stages: vec![
                StageSpec::new(StageKind::PersistTranscript, StageInput::Transcript),
                StageSpec::new(StageKind::GenerateSummary, StageInput::Transcript),
                StageSpec::new(
                    StageKind::ProvisionFollowUp,
                    StageInput::OutputOf(StageKind::GenerateSummary),
                ),
                StageSpec::new(
                    StageKind::PollArtifact,
                    StageInput::OutputOf(StageKind::ProvisionFollowUp),
                ),
            ],
        }
    }

    /// Client interview: verifies and enriches the provider's story, then
    /// triggers compilation of the merged artifact.
    pub fn client(names: EntityNames) -> Self {
        let opening_line = format!(
            "Hi there! Thanks for joining to chat about \"{}\" today.",
            names.project_title
        );
        Self {
            role: ParticipantRole::Client,
            prompt: PromptConfig {
                persona: "You are a warm, curious AI interviewer speaking with the client \
                          about a project their provider already described. Sound genuinely \
                          interested, never scripted."
                    .to_string(),
                flow: vec![
                    "Greet the client, introduce yourself, and ask them to introduce \
                     themselves and their role."
                        .to_string(),
                    "Recap the provider's version of the story and ask whether it sounds \
                     right."
                        .to_string(),
                    "Ask why they chose the provider, what benefits they saw, and for any \
                     measurable impact."
                        .to_string(),
                    "Collect a quote they are comfortable including, then close warmly."
                        .to_string(),
                ],
                known_names: Some(names),
            },
            opening_line,
            closing_remark: None,
            farewell_grace: Duration::ZERO,
            max_duration: Duration::from_secs(600),
            farewell: FarewellDetector::default(),
            voice: "coral".to_string(),
            transcription_model: "whisper-1".to_string(),
            turn_detection_mode: "server-vad".to_string(),
            stages: vec![
                StageSpec::new(StageKind::PersistTranscript, StageInput::Transcript),
                StageSpec::new(StageKind::GenerateSummary, StageInput::Transcript),
                StageSpec::new(
                    StageKind::CompileArtifact,
                    StageInput::OutputOf(StageKind::GenerateSummary),
                ),
                StageSpec::new(
                    StageKind::PollArtifact,
                    StageInput::OutputOf(StageKind::CompileArtifact),
                ),
            ],
        }
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn with_farewell_phrases(mut self, phrases: Vec<String>) -> Self {
        self.farewell = FarewellDetector::new(phrases);
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}
