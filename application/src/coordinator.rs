//! Session coordinator actor
//!
//! One task owns the [`SessionStore`] and a per-session broadcast
//! channel registry. Actions from every connection funnel through a
//! single mailbox and are applied strictly in arrival order; each apply
//! and its broadcast happen in one synchronous step, so no subscriber
//! ever observes a partially-applied update. Sessions are independent,
//! but a single actor is plenty at this scale and keeps ordering
//! trivial.

use reelmatch_domain::{ApplyOutcome, SessionAction, SessionPhase, SessionSnapshot, SessionStore};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

/// Capacity of a session's snapshot fan-out channel. Slow subscribers
/// that lag past this many snapshots miss intermediate states but
/// always converge on the latest one.
const BROADCAST_CAPACITY: usize = 64;

/// Mailbox depth for inbound commands
const MAILBOX_CAPACITY: usize = 256;

/// Errors surfaced by [`CoordinatorHandle`]
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Coordinator task has shut down")]
    Closed,
}

enum Command {
    Action(SessionAction),
    Subscribe {
        session_id: String,
        reply: oneshot::Sender<broadcast::Receiver<SessionSnapshot>>,
    },
}

/// Cloneable handle for talking to the coordinator task
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    /// Queue one action for in-order application.
    ///
    /// There is no per-action reply; all effects are observed through
    /// the broadcast snapshots.
    pub async fn send(&self, action: SessionAction) -> Result<(), CoordinatorError> {
        self.tx
            .send(Command::Action(action))
            .await
            .map_err(|_| CoordinatorError::Closed)
    }

    pub async fn join(
        &self,
        session_id: impl Into<String>,
        participant_id: impl Into<String>,
        as_host: bool,
    ) -> Result<(), CoordinatorError> {
        self.send(SessionAction::Join {
            session_id: session_id.into(),
            participant_id: participant_id.into(),
            as_host,
        })
        .await
    }

    pub async fn leave(
        &self,
        session_id: impl Into<String>,
        participant_id: impl Into<String>,
    ) -> Result<(), CoordinatorError> {
        self.send(SessionAction::Leave {
            session_id: session_id.into(),
            participant_id: participant_id.into(),
        })
        .await
    }

    pub async fn set_phase(
        &self,
        session_id: impl Into<String>,
        phase: SessionPhase,
    ) -> Result<(), CoordinatorError> {
        self.send(SessionAction::SetPhase {
            session_id: session_id.into(),
            phase,
        })
        .await
    }

    pub async fn set_shared_config(
        &self,
        session_id: impl Into<String>,
        config: Vec<String>,
    ) -> Result<(), CoordinatorError> {
        self.send(SessionAction::SetSharedConfig {
            session_id: session_id.into(),
            config,
        })
        .await
    }

    pub async fn record_intake_answer(
        &self,
        session_id: impl Into<String>,
        participant_id: impl Into<String>,
        answers: reelmatch_domain::PreferenceAnswers,
    ) -> Result<(), CoordinatorError> {
        self.send(SessionAction::RecordIntakeAnswer {
            session_id: session_id.into(),
            participant_id: participant_id.into(),
            answers,
        })
        .await
    }

    /// Subscribe to a session's snapshot stream.
    ///
    /// Valid before the session exists; the first snapshot arrives with
    /// the join that creates it. The reply also serves as an ordering
    /// barrier: once it resolves, every previously queued action has
    /// been applied.
    pub async fn subscribe(
        &self,
        session_id: impl Into<String>,
    ) -> Result<broadcast::Receiver<SessionSnapshot>, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Subscribe {
                session_id: session_id.into(),
                reply,
            })
            .await
            .map_err(|_| CoordinatorError::Closed)?;
        rx.await.map_err(|_| CoordinatorError::Closed)
    }
}

/// The coordinator task state
pub struct SessionCoordinator {
    store: SessionStore,
    channels: HashMap<String, broadcast::Sender<SessionSnapshot>>,
    rx: mpsc::Receiver<Command>,
}

impl SessionCoordinator {
    /// Spawn the coordinator task and return its handle.
    pub fn spawn() -> CoordinatorHandle {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let coordinator = SessionCoordinator {
            store: SessionStore::new(),
            channels: HashMap::new(),
            rx,
        };
        tokio::spawn(coordinator.run());
        CoordinatorHandle { tx }
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        debug!("coordinator mailbox closed, shutting down");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Action(action) => {
                let session_id = action.session_id().to_string();
                match self.store.apply(action) {
                    ApplyOutcome::Updated(snapshot) => {
                        if let Some(tx) = self.channels.get(&session_id) {
                            // Send fails only when nobody is subscribed
                            let _ = tx.send(snapshot);
                        }
                    }
                    ApplyOutcome::Destroyed => {
                        info!(session_id, "last member left, session destroyed");
                        self.channels.remove(&session_id);
                    }
                    ApplyOutcome::Dropped => {
                        debug!(session_id, "dropped action for unknown session");
                    }
                }
            }
            Command::Subscribe { session_id, reply } => {
                let tx = self
                    .channels
                    .entry(session_id)
                    .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0);
                let _ = reply.send(tx.subscribe());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    /// Flush the mailbox: when the subscribe reply arrives, every
    /// action queued before it has been applied.
    async fn barrier(handle: &CoordinatorHandle) {
        let _ = handle.subscribe("__barrier__").await.unwrap();
    }

    #[tokio::test]
    async fn test_join_broadcasts_snapshot() {
        let handle = SessionCoordinator::spawn();
        let mut rx = handle.subscribe("abc123").await.unwrap();

        handle.join("abc123", "u1", true).await.unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.members, vec!["u1"]);
        assert_eq!(snapshot.phase, SessionPhase::Waiting);
    }

    #[tokio::test]
    async fn test_every_member_observes_each_mutation() {
        let handle = SessionCoordinator::spawn();
        let mut rx_a = handle.subscribe("abc123").await.unwrap();
        let mut rx_b = handle.subscribe("abc123").await.unwrap();

        handle.join("abc123", "u1", true).await.unwrap();
        handle.join("abc123", "u2", false).await.unwrap();
        handle.set_phase("abc123", SessionPhase::Priming).await.unwrap();

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.recv().await.unwrap().members, vec!["u1"]);
            assert_eq!(rx.recv().await.unwrap().members, vec!["u1", "u2"]);
            assert_eq!(rx.recv().await.unwrap().phase, SessionPhase::Priming);
        }
    }

    #[tokio::test]
    async fn test_action_after_destruction_broadcasts_nothing() {
        let handle = SessionCoordinator::spawn();
        let mut rx = handle.subscribe("abc123").await.unwrap();

        handle.join("abc123", "u1", true).await.unwrap();
        handle.leave("abc123", "u1").await.unwrap();
        handle.set_phase("abc123", SessionPhase::Voting).await.unwrap();
        barrier(&handle).await;

        // Only the join produced a snapshot; destruction is silent, it
        // just closes the channel, and the late set_phase was dropped.
        assert_eq!(rx.recv().await.unwrap().members, vec!["u1"]);
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Closed);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let handle = SessionCoordinator::spawn();
        let mut rx_one = handle.subscribe("one").await.unwrap();
        let mut rx_two = handle.subscribe("two").await.unwrap();

        handle.join("one", "u1", true).await.unwrap();
        handle.join("two", "u2", true).await.unwrap();
        barrier(&handle).await;

        assert_eq!(rx_one.recv().await.unwrap().members, vec!["u1"]);
        assert_eq!(rx_one.try_recv().unwrap_err(), TryRecvError::Empty);
        assert_eq!(rx_two.recv().await.unwrap().members, vec!["u2"]);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_absorbed() {
        let handle = SessionCoordinator::spawn();
        let mut rx = handle.subscribe("abc123").await.unwrap();

        handle.join("abc123", "u1", true).await.unwrap();
        handle.join("abc123", "u1", true).await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        // Re-delivery re-broadcasts the same merged state
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_rejoin_after_destruction_is_fresh_session() {
        let handle = SessionCoordinator::spawn();

        handle.join("abc123", "u1", true).await.unwrap();
        handle.set_phase("abc123", SessionPhase::Voting).await.unwrap();
        handle.leave("abc123", "u1").await.unwrap();
        barrier(&handle).await;

        let mut rx = handle.subscribe("abc123").await.unwrap();
        handle.join("abc123", "u2", true).await.unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.members, vec!["u2"]);
        assert_eq!(snapshot.phase, SessionPhase::Waiting);
    }
}
