//! Participant actions merged by the session store

use crate::priming::PreferenceAnswers;
use crate::session::entities::SessionPhase;
use serde::{Deserialize, Serialize};

/// A participant action against one session
///
/// Actions arrive over an at-least-once transport, so every variant
/// merges idempotently: membership changes are set operations, the
/// rest overwrite scalars. Replaying an action leaves the session in
/// the same state it produced the first time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionAction {
    #[serde(rename_all = "camelCase")]
    Join {
        session_id: String,
        participant_id: String,
        as_host: bool,
    },
    #[serde(rename_all = "camelCase")]
    Leave {
        session_id: String,
        participant_id: String,
    },
    #[serde(rename_all = "camelCase")]
    SetPhase {
        session_id: String,
        phase: SessionPhase,
    },
    #[serde(rename_all = "camelCase")]
    SetSharedConfig {
        session_id: String,
        config: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    RecordIntakeAnswer {
        session_id: String,
        participant_id: String,
        answers: PreferenceAnswers,
    },
}

impl SessionAction {
    /// The session this action targets
    pub fn session_id(&self) -> &str {
        match self {
            SessionAction::Join { session_id, .. }
            | SessionAction::Leave { session_id, .. }
            | SessionAction::SetPhase { session_id, .. }
            | SessionAction::SetSharedConfig { session_id, .. }
            | SessionAction::RecordIntakeAnswer { session_id, .. } => session_id,
        }
    }

    /// Whether this action may create a session record
    pub fn creates_session(&self) -> bool {
        matches!(self, SessionAction::Join { .. })
    }
}
