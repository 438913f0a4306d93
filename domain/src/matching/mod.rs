//! Consensus detection over a shared candidate deck

pub mod engine;
pub mod quorum;

pub use engine::MatchEngine;
pub use quorum::MatchQuorum;
