//! Shared session state and the store that merges participant actions

pub mod action;
pub mod entities;
pub mod store;

pub use action::SessionAction;
pub use entities::{Session, SessionPhase, SessionSnapshot};
pub use store::{ApplyOutcome, SessionStore};
