//! Utterance log and transcript assembly
//!
//! Streamed transcript fragments arrive per speaker and are buffered until a
//! finalize event closes them into an immutable [`Utterance`]. The ordered
//! [`Transcript`] is append-only while the session runs and frozen once it
//! terminates.

mod assembler;

pub use assembler::TranscriptAssembler;

use serde::{Deserialize, Serialize};

/// Who produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// The human participant.
    #[serde(rename = "self")]
    Participant,
    /// The AI interviewer.
    #[serde(rename = "assistant")]
    Assistant,
}

impl Speaker {
    /// Uppercase label used in the formatted transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Participant => "SELF",
            Speaker::Assistant => "ASSISTANT",
        }
    }
}

/// One finalized, attributed span of spoken text. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
    /// Position in the transcript, assigned at append time.
    pub index: usize,
}

/// Ordered utterance log. Insertion order is significant and never changes;
/// appends are refused once the transcript is frozen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<Utterance>,
    frozen: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized utterance. Returns the assigned index, or `None`
    /// if the transcript is frozen.
    pub(crate) fn push(&mut self, speaker: Speaker, text: String) -> Option<usize> {
        if self.frozen {
            return None;
        }
        let index = self.entries.len();
        self.entries.push(Utterance {
            speaker,
            text,
            index,
        });
        Some(index)
    }

    /// Make the transcript read-only. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `SPEAKER: text` lines, the layout the summarization backend
    /// consumes.
    pub fn formatted(&self) -> String {
        self.entries
            .iter()
            .map(|u| format!("{}: {}", u.speaker.label(), u.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
