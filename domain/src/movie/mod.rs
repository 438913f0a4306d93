//! Movie candidates and vote events

pub mod entities;

pub use entities::{Genre, Movie, MovieVote, WatchProvider};
