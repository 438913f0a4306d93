//! Build the voting deck for a round
//!
//! The group's merged preferences become several weighted discover
//! queries; results are merged with an explicit relevance score (the
//! sum of the weights of every query that returned a movie), then
//! weight-shuffled so relevant movies tend to surface early while the
//! deck order stays random. Finally each retained movie is enriched
//! with detail data (runtime, watch providers, certification).

use crate::ports::{DiscoverQuery, MovieCatalog, SortOrder};
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reelmatch_domain::{Movie, PreferenceAnswers, is_unconstrained};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use futures::StreamExt;

/// Genre matches are the strongest relevance signal
const GENRE_WEIGHT: u32 = 3;
const ERA_WEIGHT: u32 = 2;
const MOOD_WEIGHT: u32 = 2;
const FALLBACK_WEIGHT: u32 = 1;

/// Pages fetched per discover query
const PAGES_PER_QUERY: u32 = 2;

/// Deck size bounds after deduplication
const MIN_DECK: usize = 200;
const MAX_DECK: usize = 500;

/// Target deck size per participant before clamping
const MOVIES_PER_MEMBER: usize = 25;

/// Concurrent detail fetches during enrichment
const DETAIL_CONCURRENCY: usize = 8;

/// Errors from deck building
#[derive(Error, Debug)]
pub enum DeckError {
    /// Every preference-derived query came back empty. Voting cannot
    /// start on an empty deck; the caller should surface this and let
    /// the user retry rather than loop on an unsatisfiable filter.
    #[error("No movies matched the group's preferences")]
    NoCandidates,
}

/// Input for one deck build
#[derive(Debug, Clone)]
pub struct DeckRequest {
    /// Merged preference answers of every member
    pub preferences: PreferenceAnswers,
    /// Streaming service slugs selected by the host
    pub services: Vec<String>,
    pub member_count: usize,
}

/// A discover query plus its relevance weight
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedQuery {
    pub query: DiscoverQuery,
    pub weight: u32,
}

/// Derive the weighted query plan from the group's preferences.
///
/// Each preference category that carries a real constraint contributes
/// one or more queries; the unweighted popularity query is always last
/// so an over-constrained group still gets a deck.
pub fn plan_queries(preferences: &PreferenceAnswers, services: &[String]) -> Vec<WeightedQuery> {
    let base = DiscoverQuery {
        providers: services.to_vec(),
        ..DiscoverQuery::default()
    };
    let selected = |id: &str| -> &[String] {
        preferences.get(id).map(Vec::as_slice).unwrap_or(&[])
    };
    let mut queries = Vec::new();

    let genres = selected("genre");
    if !is_unconstrained(genres) {
        queries.push(WeightedQuery {
            query: DiscoverQuery {
                genres: genres.to_vec(),
                sort: SortOrder::VoteAverage,
                ..base.clone()
            },
            weight: GENRE_WEIGHT,
        });
    }

    let eras = selected("era");
    if !is_unconstrained(eras) {
        let has = |v: &str| eras.iter().any(|e| e == v);
        if has("classic") {
            queries.push(WeightedQuery {
                query: DiscoverQuery {
                    release_before: Some("1980-12-31".to_string()),
                    ..base.clone()
                },
                weight: ERA_WEIGHT,
            });
        }
        if has("modern") {
            queries.push(WeightedQuery {
                query: DiscoverQuery {
                    release_after: Some("1980-01-01".to_string()),
                    release_before: Some("2010-12-31".to_string()),
                    ..base.clone()
                },
                weight: ERA_WEIGHT,
            });
        }
        if has("contemporary") {
            queries.push(WeightedQuery {
                query: DiscoverQuery {
                    release_after: Some("2010-01-01".to_string()),
                    ..base.clone()
                },
                weight: ERA_WEIGHT,
            });
        }
    }

    let moods = selected("mood");
    if !is_unconstrained(moods) {
        let has = |v: &str| moods.iter().any(|m| m == v);
        let mood_genres = |slugs: &[&str]| slugs.iter().map(|s| s.to_string()).collect();
        if has("light") {
            queries.push(WeightedQuery {
                query: DiscoverQuery {
                    genres: mood_genres(&["comedy", "family"]),
                    ..base.clone()
                },
                weight: MOOD_WEIGHT,
            });
        }
        if has("intense") {
            queries.push(WeightedQuery {
                query: DiscoverQuery {
                    genres: mood_genres(&["action", "thriller", "horror"]),
                    ..base.clone()
                },
                weight: MOOD_WEIGHT,
            });
        }
        if has("thoughtful") {
            queries.push(WeightedQuery {
                query: DiscoverQuery {
                    genres: mood_genres(&["drama", "documentary"]),
                    min_vote_average: 7.5,
                    ..base.clone()
                },
                weight: MOOD_WEIGHT,
            });
        }
    }

    queries.push(WeightedQuery {
        query: base,
        weight: FALLBACK_WEIGHT,
    });
    queries
}

/// Merge query results, deduplicating by id.
///
/// A movie's relevance score is the sum of the weights of every query
/// that returned it. First-encounter order is preserved so the merge is
/// deterministic before shuffling.
fn merge_scored(results: Vec<(Vec<Movie>, u32)>) -> Vec<(Movie, u32)> {
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut scored: Vec<(Movie, u32)> = Vec::new();
    for (movies, weight) in results {
        // The same query can repeat a movie across pages; count it once
        let mut counted_here: HashSet<u64> = HashSet::new();
        for movie in movies {
            match index.get(&movie.id) {
                Some(&i) => {
                    if counted_here.insert(movie.id) {
                        scored[i].1 += weight;
                    }
                }
                None => {
                    counted_here.insert(movie.id);
                    index.insert(movie.id, scored.len());
                    scored.push((movie, weight));
                }
            }
        }
    }
    scored
}

/// Weighted shuffle (Efraimidis-Spirakis): each movie gets the sort key
/// `u^(1/score)` with `u` uniform in [0,1); higher scores tend to draw
/// higher keys and land earlier, but any order remains possible.
fn weighted_shuffle<R: Rng>(scored: Vec<(Movie, u32)>, rng: &mut R) -> Vec<Movie> {
    let mut keyed: Vec<(f64, Movie)> = scored
        .into_iter()
        .map(|(movie, score)| {
            let u: f64 = rng.r#gen();
            (u.powf(1.0 / score.max(1) as f64), movie)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, movie)| movie).collect()
}

/// Use case: assemble a deck sized for the whole group
pub struct BuildDeckUseCase {
    catalog: Arc<dyn MovieCatalog>,
}

impl BuildDeckUseCase {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }

    /// Build a deck with a fresh RNG.
    pub async fn execute(&self, request: &DeckRequest) -> Result<Vec<Movie>, DeckError> {
        self.execute_with_rng(request, &mut StdRng::from_entropy())
            .await
    }

    /// Build a deck with an injected RNG (deterministic in tests).
    ///
    /// Individual query failures are logged and skipped; only a fully
    /// empty result set is an error, and in that case the caller's
    /// current deck is left untouched because nothing is returned.
    pub async fn execute_with_rng<R: Rng>(
        &self,
        request: &DeckRequest,
        rng: &mut R,
    ) -> Result<Vec<Movie>, DeckError> {
        let queries = plan_queries(&request.preferences, &request.services);
        debug!(query_count = queries.len(), "planned deck queries");

        let mut results: Vec<(Vec<Movie>, u32)> = Vec::new();
        for weighted in &queries {
            let mut movies = Vec::new();
            for page in 1..=PAGES_PER_QUERY {
                match self.catalog.discover(&weighted.query.clone().with_page(page)).await {
                    Ok(batch) => movies.extend(batch),
                    Err(error) => {
                        warn!(%error, page, "discover query failed, skipping page");
                    }
                }
            }
            if !movies.is_empty() {
                results.push((movies, weighted.weight));
            }
        }

        let scored = merge_scored(results);
        if scored.is_empty() {
            return Err(DeckError::NoCandidates);
        }

        let mut deck = weighted_shuffle(scored, rng);
        let target = (request.member_count * MOVIES_PER_MEMBER).max(10);
        deck.truncate(target.clamp(MIN_DECK, MAX_DECK));
        debug!(deck_size = deck.len(), "deck assembled, fetching details");

        let enriched = futures::stream::iter(deck.into_iter().map(|movie| {
            let catalog = Arc::clone(&self.catalog);
            async move {
                match catalog.movie_details(movie.id).await {
                    Ok(full) => full,
                    Err(error) => {
                        debug!(movie_id = movie.id, %error, "detail fetch failed, keeping discover record");
                        movie
                    }
                }
            }
        }))
        .buffered(DETAIL_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

        Ok(enriched)
    }
}
