//! Session domain entities

use crate::priming::PreferenceAnswers;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::core::DomainError;

/// Lifecycle phase of a session
///
/// Phases advance `Waiting -> Priming -> Voting -> Matched` within a
/// round; `Matched -> Voting` is the explicit "keep matching"
/// continuation, not a new round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Waiting,
    Priming,
    Voting,
    Matched,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionPhase::Waiting => "waiting",
            SessionPhase::Priming => "priming",
            SessionPhase::Voting => "voting",
            SessionPhase::Matched => "matched",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SessionPhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(SessionPhase::Waiting),
            "priming" => Ok(SessionPhase::Priming),
            "voting" => Ok(SessionPhase::Voting),
            "matched" => Ok(SessionPhase::Matched),
            other => Err(DomainError::UnknownPhase(other.to_string())),
        }
    }
}

/// One shared group-voting instance (Entity)
///
/// Owned exclusively by the coordinator's session store; everything a
/// member observes comes from broadcast [`SessionSnapshot`]s.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    members: HashSet<String>,
    host_id: Option<String>,
    phase: SessionPhase,
    shared_config: Vec<String>,
    intake_answers: HashMap<String, PreferenceAnswers>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: HashSet::new(),
            host_id: None,
            phase: SessionPhase::Waiting,
            shared_config: Vec::new(),
            intake_answers: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &HashSet<String> {
        &self.members
    }

    pub fn host_id(&self) -> Option<&str> {
        self.host_id.as_deref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a member. Re-joining is a no-op (set semantics).
    ///
    /// The host is whoever first joins flagged as host; once assigned it
    /// never changes, even if that member later leaves.
    pub fn join(&mut self, participant_id: impl Into<String>, as_host: bool) {
        let participant_id = participant_id.into();
        if as_host && self.host_id.is_none() {
            self.host_id = Some(participant_id.clone());
        }
        self.members.insert(participant_id);
    }

    /// Remove a member. Leaving when not a member is a no-op.
    pub fn leave(&mut self, participant_id: &str) {
        self.members.remove(participant_id);
    }

    /// Overwrite the phase. Transition legality is client policy; the
    /// session record accepts whatever arrives.
    pub fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
    }

    pub fn set_shared_config(&mut self, config: Vec<String>) {
        self.shared_config = config;
    }

    /// Insert or overwrite one member's intake answers.
    pub fn record_intake_answer(&mut self, participant_id: impl Into<String>, answers: PreferenceAnswers) {
        self.intake_answers.insert(participant_id.into(), answers);
    }

    /// The full broadcast view of this session's mutable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut members: Vec<String> = self.members.iter().cloned().collect();
        members.sort_unstable();
        SessionSnapshot {
            members,
            phase: self.phase,
            shared_config: self.shared_config.clone(),
            intake_answers: self.intake_answers.clone(),
        }
    }
}

/// The state broadcast to every member after each mutation
///
/// Member order is sorted so identical states serialize identically;
/// the underlying membership is a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub members: Vec<String>,
    pub phase: SessionPhase,
    pub shared_config: Vec<String>,
    pub intake_answers: HashMap<String, PreferenceAnswers>,
}
