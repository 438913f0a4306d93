//! Domain layer for reelmatch
//!
//! This crate contains the core business logic, entities, and value
//! objects. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! One shared group-voting instance. The coordinator owns a
//! [`SessionStore`] and merges every participant action into it in
//! arrival order; members only ever observe broadcast
//! [`SessionSnapshot`]s.
//!
//! ## Match Engine
//!
//! Each participant's client runs an identical [`MatchEngine`] over the
//! same deck. Votes are relayed through the session channel, so every
//! engine converges on the same approval ledger and declares the same
//! matches. A candidate matches once [`MatchQuorum`] distinct
//! participants approve it (pairwise by default).

pub mod core;
pub mod matching;
pub mod movie;
pub mod priming;
pub mod session;

// Re-export commonly used types
pub use crate::core::DomainError;
pub use matching::{MatchEngine, MatchQuorum};
pub use movie::{Genre, Movie, MovieVote, WatchProvider};
pub use priming::{
    PreferenceAnswers, PrimingQuestion, QuestionOption, is_unconstrained, merge_answers,
    priming_questions,
};
pub use session::{
    ApplyOutcome, Session, SessionAction, SessionPhase, SessionSnapshot, SessionStore,
};
