//! Application use cases

pub mod build_deck;

pub use build_deck::{BuildDeckUseCase, DeckError, DeckRequest, WeightedQuery, plan_queries};
