//! Ports (interfaces) to the outside world

pub mod movie_catalog;

pub use movie_catalog::{CatalogError, DiscoverQuery, MovieCatalog, SortOrder};
