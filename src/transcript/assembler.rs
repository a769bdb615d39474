use std::collections::HashMap;

use tracing::debug;

use super::{Speaker, Transcript};

/// Accumulates streamed fragments into finalized utterances.
///
/// At most one in-progress buffer exists per speaker; finalizing clears it.
/// Finalize order equals arrival order, so transcript order is the order the
/// dispatcher delivered finalize events.
#[derive(Debug, Default)]
pub struct TranscriptAssembler {
    transcript: Transcript,
    pending: HashMap<Speaker, String>,
}

impl TranscriptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta fragment to the speaker's pending buffer. Fragments
    /// concatenate with a single separating space; an empty delta is a no-op.
    pub fn push_delta(&mut self, speaker: Speaker, delta: &str) {
        if delta.is_empty() {
            return;
        }
        let buffer = self.pending.entry(speaker).or_default();
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(delta);
    }

    /// Close the speaker's utterance and append it to the transcript.
    ///
    /// The utterance text is the accumulated deltas when any exist, otherwise
    /// the final frame's own text. An empty result appends nothing, so empty
    /// utterances never pollute the log. Returns the appended index.
    pub fn finalize(&mut self, speaker: Speaker, final_text: &str) -> Option<usize> {
        let buffered = self.pending.remove(&speaker).unwrap_or_default();
        let text = if buffered.is_empty() {
            final_text.to_string()
        } else {
            buffered
        };

        if text.trim().is_empty() {
            debug!("Discarding empty finalize for {:?}", speaker);
            return None;
        }

        self.transcript.push(speaker, text)
    }

    /// Drop the speaker's in-progress buffer without appending.
    pub fn discard_pending(&mut self, speaker: Speaker) {
        self.pending.remove(&speaker);
    }

    /// Text buffered for `speaker`, if any.
    pub fn pending(&self, speaker: Speaker) -> Option<&str> {
        self.pending.get(&speaker).map(String::as_str)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Freeze the transcript; later finalize calls append nothing.
    pub fn freeze(&mut self) -> &Transcript {
        self.pending.clear();
        self.transcript.freeze();
        &self.transcript
    }
}
