//! Wire protocol for the session relay
//!
//! Newline-delimited JSON frames, one message per line. Event names
//! match the original socket protocol so clients stay portable.

use reelmatch_domain::{PreferenceAnswers, SessionAction, SessionPhase, SessionSnapshot};
use serde::{Deserialize, Serialize};

/// Inbound client frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "joinParty", rename_all = "camelCase")]
    JoinParty {
        party_id: String,
        user_id: String,
        #[serde(default)]
        is_host: bool,
    },
    #[serde(rename = "leaveParty", rename_all = "camelCase")]
    LeaveParty { party_id: String, user_id: String },
    #[serde(rename = "updatePartyStatus", rename_all = "camelCase")]
    UpdatePartyStatus {
        party_id: String,
        status: SessionPhase,
    },
    #[serde(rename = "updateSelectedServices", rename_all = "camelCase")]
    UpdateSelectedServices {
        party_id: String,
        services: Vec<String>,
    },
    #[serde(rename = "submitPrimingAnswers", rename_all = "camelCase")]
    SubmitPrimingAnswers {
        party_id: String,
        user_id: String,
        answers: PreferenceAnswers,
    },
}

impl ClientMessage {
    /// The session this message targets
    pub fn party_id(&self) -> &str {
        match self {
            ClientMessage::JoinParty { party_id, .. }
            | ClientMessage::LeaveParty { party_id, .. }
            | ClientMessage::UpdatePartyStatus { party_id, .. }
            | ClientMessage::UpdateSelectedServices { party_id, .. }
            | ClientMessage::SubmitPrimingAnswers { party_id, .. } => party_id,
        }
    }

    /// Translate the wire frame into a coordinator action
    pub fn into_action(self) -> SessionAction {
        match self {
            ClientMessage::JoinParty {
                party_id,
                user_id,
                is_host,
            } => SessionAction::Join {
                session_id: party_id,
                participant_id: user_id,
                as_host: is_host,
            },
            ClientMessage::LeaveParty { party_id, user_id } => SessionAction::Leave {
                session_id: party_id,
                participant_id: user_id,
            },
            ClientMessage::UpdatePartyStatus { party_id, status } => SessionAction::SetPhase {
                session_id: party_id,
                phase: status,
            },
            ClientMessage::UpdateSelectedServices { party_id, services } => {
                SessionAction::SetSharedConfig {
                    session_id: party_id,
                    config: services,
                }
            }
            ClientMessage::SubmitPrimingAnswers {
                party_id,
                user_id,
                answers,
            } => SessionAction::RecordIntakeAnswer {
                session_id: party_id,
                participant_id: user_id,
                answers,
            },
        }
    }
}

/// Outbound server frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "partyUpdated")]
    PartyUpdated(SessionSnapshot),
}
