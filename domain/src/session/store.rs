//! Owned store of live session records
//!
//! One [`SessionStore`] instance is owned by the coordinator; it is a
//! plain map with explicit init and teardown, never process-global
//! state. All merge operations are idempotent so at-least-once
//! delivery cannot corrupt a record.

use crate::session::action::SessionAction;
use crate::session::entities::{Session, SessionSnapshot};
use std::collections::HashMap;

/// What applying an action did to the store
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The session changed (or re-confirmed its state); broadcast this
    /// snapshot to every member.
    Updated(SessionSnapshot),
    /// The last member left; the record is gone and there is nobody
    /// left to notify.
    Destroyed,
    /// The action referenced a session with no live record and was
    /// silently dropped (expected race with session destruction).
    Dropped,
}

impl ApplyOutcome {
    pub fn snapshot(&self) -> Option<&SessionSnapshot> {
        match self {
            ApplyOutcome::Updated(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// In-memory map of session id to live session record
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Merge one action into the store, in arrival order.
    ///
    /// `Join` creates the record if absent; every other action on an
    /// unknown session id is dropped. A leave that empties the session
    /// destroys the record in the same step, so no caller can ever
    /// observe a session with zero members.
    pub fn apply(&mut self, action: SessionAction) -> ApplyOutcome {
        match action {
            SessionAction::Join {
                session_id,
                participant_id,
                as_host,
            } => {
                let session = self
                    .sessions
                    .entry(session_id.clone())
                    .or_insert_with(|| Session::new(session_id));
                session.join(participant_id, as_host);
                ApplyOutcome::Updated(session.snapshot())
            }
            SessionAction::Leave {
                session_id,
                participant_id,
            } => {
                let Some(session) = self.sessions.get_mut(&session_id) else {
                    return ApplyOutcome::Dropped;
                };
                session.leave(&participant_id);
                if session.is_empty() {
                    self.sessions.remove(&session_id);
                    ApplyOutcome::Destroyed
                } else {
                    ApplyOutcome::Updated(session.snapshot())
                }
            }
            SessionAction::SetPhase { session_id, phase } => {
                self.update(&session_id, |s| s.set_phase(phase))
            }
            SessionAction::SetSharedConfig { session_id, config } => {
                self.update(&session_id, |s| s.set_shared_config(config))
            }
            SessionAction::RecordIntakeAnswer {
                session_id,
                participant_id,
                answers,
            } => self.update(&session_id, |s| {
                s.record_intake_answer(participant_id, answers)
            }),
        }
    }

    fn update(&mut self, session_id: &str, f: impl FnOnce(&mut Session)) -> ApplyOutcome {
        match self.sessions.get_mut(session_id) {
            Some(session) => {
                f(session);
                ApplyOutcome::Updated(session.snapshot())
            }
            None => ApplyOutcome::Dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::SessionPhase;

    fn join(session_id: &str, participant_id: &str, as_host: bool) -> SessionAction {
        SessionAction::Join {
            session_id: session_id.to_string(),
            participant_id: participant_id.to_string(),
            as_host,
        }
    }

    fn leave(session_id: &str, participant_id: &str) -> SessionAction {
        SessionAction::Leave {
            session_id: session_id.to_string(),
            participant_id: participant_id.to_string(),
        }
    }

    #[test]
    fn test_join_creates_session() {
        let mut store = SessionStore::new();
        let outcome = store.apply(join("abc123", "u1", true));

        let snapshot = outcome.snapshot().unwrap();
        assert_eq!(snapshot.members, vec!["u1"]);
        assert_eq!(store.get("abc123").unwrap().host_id(), Some("u1"));
    }

    #[test]
    fn test_duplicate_join_rebroadcasts_same_state() {
        let mut store = SessionStore::new();
        let first = store.apply(join("abc123", "u1", true));
        let second = store.apply(join("abc123", "u1", true));
        assert_eq!(first, second);
    }

    #[test]
    fn test_membership_is_set_valued() {
        let mut store = SessionStore::new();
        store.apply(join("abc123", "u1", false));
        store.apply(join("abc123", "u2", false));
        store.apply(join("abc123", "u1", false));
        store.apply(leave("abc123", "u2"));
        store.apply(leave("abc123", "u2"));

        let snapshot = store.apply(join("abc123", "u3", false));
        let mut members = snapshot.snapshot().unwrap().members.clone();
        members.sort_unstable();
        assert_eq!(members, vec!["u1", "u3"]);
    }

    #[test]
    fn test_last_leave_destroys_session() {
        let mut store = SessionStore::new();
        store.apply(join("abc123", "u1", true));
        let outcome = store.apply(leave("abc123", "u1"));

        assert_eq!(outcome, ApplyOutcome::Destroyed);
        assert!(store.get("abc123").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_action_after_destruction_is_dropped() {
        let mut store = SessionStore::new();
        store.apply(join("abc123", "u1", true));
        store.apply(leave("abc123", "u1"));

        let outcome = store.apply(SessionAction::SetPhase {
            session_id: "abc123".to_string(),
            phase: SessionPhase::Voting,
        });
        assert_eq!(outcome, ApplyOutcome::Dropped);
    }

    #[test]
    fn test_rejoin_after_destruction_starts_fresh() {
        let mut store = SessionStore::new();
        store.apply(join("abc123", "u1", true));
        store.apply(SessionAction::SetPhase {
            session_id: "abc123".to_string(),
            phase: SessionPhase::Voting,
        });
        store.apply(leave("abc123", "u1"));

        // Same id, brand-new session: phase resets, host reassignable
        store.apply(join("abc123", "u2", true));
        let session = store.get("abc123").unwrap();
        assert_eq!(session.phase(), SessionPhase::Waiting);
        assert_eq!(session.host_id(), Some("u2"));
    }

    #[test]
    fn test_set_phase_and_config_overwrite() {
        let mut store = SessionStore::new();
        store.apply(join("abc123", "u1", true));

        store.apply(SessionAction::SetSharedConfig {
            session_id: "abc123".to_string(),
            config: vec!["netflix".to_string(), "hulu".to_string()],
        });
        let outcome = store.apply(SessionAction::SetPhase {
            session_id: "abc123".to_string(),
            phase: SessionPhase::Priming,
        });

        let snapshot = outcome.snapshot().unwrap();
        assert_eq!(snapshot.phase, SessionPhase::Priming);
        assert_eq!(snapshot.shared_config, vec!["netflix", "hulu"]);
    }

    #[test]
    fn test_intake_answers_grow_per_member() {
        let mut store = SessionStore::new();
        store.apply(join("abc123", "u1", true));
        store.apply(join("abc123", "u2", false));

        let mut answers = crate::priming::PreferenceAnswers::new();
        answers.insert("genre".to_string(), vec!["comedy".to_string()]);
        store.apply(SessionAction::RecordIntakeAnswer {
            session_id: "abc123".to_string(),
            participant_id: "u1".to_string(),
            answers: answers.clone(),
        });

        let outcome = store.apply(SessionAction::RecordIntakeAnswer {
            session_id: "abc123".to_string(),
            participant_id: "u2".to_string(),
            answers,
        });
        let snapshot = outcome.snapshot().unwrap();
        assert_eq!(snapshot.intake_answers.len(), 2);
    }
}
