//! The Movie Database adapter

pub mod client;
pub mod mapping;

pub use client::TmdbCatalog;
