use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Session lifecycle.
///
/// `Ending` is entered the instant a termination cause fires and guarantees
/// transport teardown and transcript freezing before `Ended` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Connecting,
    Negotiating,
    Active,
    Ending,
    Ended,
}

impl SessionState {
    /// `Ending` or `Ended`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Ending | SessionState::Ended)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Connecting => "connecting",
            SessionState::Negotiating => "negotiating",
            SessionState::Active => "active",
            SessionState::Ending => "ending",
            SessionState::Ended => "ended",
        };
        f.write_str(s)
    }
}

/// Why a session terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// Explicit end action by the user. Highest precedence.
    UserAction,
    /// The participant said a configured closing phrase.
    Farewell,
    /// The session's maximum-duration budget elapsed.
    TimeLimit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndReason::UserAction => "manual end by user",
            EndReason::Farewell => "participant said farewell",
            EndReason::TimeLimit => "time limit reached",
        };
        f.write_str(s)
    }
}

/// Single-fire termination latch.
///
/// Racing termination causes (a timeout firing the same tick as a farewell
/// match) must trigger the teardown handoff exactly once; whoever wins the
/// compare-exchange performs it, every late signal is a no-op.
#[derive(Debug, Default)]
pub struct EndLatch(AtomicBool);

impl EndLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to fire. Returns `true` for exactly one caller.
    pub fn fire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_fired(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
