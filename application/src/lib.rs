//! Application layer for reelmatch
//!
//! Hosts the session coordinator actor, the deck-building use case, and
//! the ports that infrastructure adapters implement. Depends only on
//! the domain layer.

pub mod coordinator;
pub mod ports;
pub mod use_cases;

pub use coordinator::{CoordinatorError, CoordinatorHandle, SessionCoordinator};
pub use ports::{CatalogError, DiscoverQuery, MovieCatalog, SortOrder};
pub use use_cases::{BuildDeckUseCase, DeckError, DeckRequest, WeightedQuery, plan_queries};
