//! Movie domain entities
//!
//! A [`Movie`] is one candidate in a voting round. Metadata is immutable
//! once fetched from the catalog; identity is the stable catalog id.

use serde::{Deserialize, Serialize};

/// A genre tag attached to a movie (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A streaming provider the movie is available on (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
}

/// A voting candidate (Entity)
///
/// Identified by its stable catalog id. The discover endpoint supplies
/// the base fields; `runtime` and `watch_providers` are filled in by the
/// per-movie detail fetch and stay empty if that enrichment fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub watch_providers: Vec<WatchProvider>,
}

impl Movie {
    /// Create a movie with only the fields every candidate must have.
    ///
    /// Mostly useful in tests; production candidates come from the
    /// catalog adapter fully populated.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            release_date: None,
            vote_average: 0.0,
            runtime: None,
            genres: Vec::new(),
            watch_providers: Vec::new(),
        }
    }

    /// Release year parsed from the `YYYY-MM-DD` release date, if any
    pub fn release_year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }
}

/// A single swipe decision relayed through the session channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieVote {
    pub movie_id: u64,
    pub participant_id: String,
    pub approved: bool,
}

impl MovieVote {
    /// Create an approval vote
    pub fn approve(movie_id: u64, participant_id: impl Into<String>) -> Self {
        Self {
            movie_id,
            participant_id: participant_id.into(),
            approved: true,
        }
    }

    /// Create a rejection vote
    pub fn reject(movie_id: u64, participant_id: impl Into<String>) -> Self {
        Self {
            movie_id,
            participant_id: participant_id.into(),
            approved: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year() {
        let mut movie = Movie::new(550, "Fight Club");
        assert_eq!(movie.release_year(), None);

        movie.release_date = Some("1999-10-15".to_string());
        assert_eq!(movie.release_year(), Some(1999));

        movie.release_date = Some("19".to_string());
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_vote_constructors() {
        let vote = MovieVote::approve(550, "u1");
        assert!(vote.approved);
        assert_eq!(vote.movie_id, 550);

        let vote = MovieVote::reject(550, "u2");
        assert!(!vote.approved);
        assert_eq!(vote.participant_id, "u2");
    }

    #[test]
    fn test_movie_deserializes_with_missing_optionals() {
        let movie: Movie = serde_json::from_str(r#"{"id": 1, "title": "Heat"}"#).unwrap();
        assert_eq!(movie.id, 1);
        assert!(movie.genres.is_empty());
        assert!(movie.runtime.is_none());
    }
}
