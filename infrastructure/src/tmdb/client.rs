//! TMDB adapter for the [`MovieCatalog`] port

use crate::config::TmdbConfig;
use crate::tmdb::mapping::{genre_id, join_ids, provider_id};
use async_trait::async_trait;
use reelmatch_application::ports::{CatalogError, DiscoverQuery, MovieCatalog, SortOrder};
use reelmatch_domain::{Genre, Movie, WatchProvider};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Results outside this region's provider listings are ignored
const WATCH_REGION: &str = "US";

/// HTTP client for The Movie Database
pub struct TmdbCatalog {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbCatalog {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::BadStatus {
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

/// Translate a port-level query into TMDB discover parameters.
///
/// Unmappable genre or provider slugs are dropped here rather than
/// rejected; an empty mapping simply omits the filter.
fn discover_params(query: &DiscoverQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("include_adult".to_string(), "false".to_string()),
        ("watch_region".to_string(), WATCH_REGION.to_string()),
        (
            "vote_average.gte".to_string(),
            query.min_vote_average.to_string(),
        ),
        (
            "vote_count.gte".to_string(),
            query.min_vote_count.to_string(),
        ),
        ("page".to_string(), query.page.to_string()),
        (
            "sort_by".to_string(),
            match query.sort {
                SortOrder::Popularity => "popularity.desc".to_string(),
                SortOrder::VoteAverage => "vote_average.desc".to_string(),
            },
        ),
    ];
    if let Some(genres) = join_ids(&query.genres, genre_id) {
        params.push(("with_genres".to_string(), genres));
    }
    if let Some(providers) = join_ids(&query.providers, provider_id) {
        params.push(("with_watch_providers".to_string(), providers));
    }
    if let Some(after) = &query.release_after {
        params.push(("primary_release_date.gte".to_string(), after.clone()));
    }
    if let Some(before) = &query.release_before {
        params.push(("primary_release_date.lte".to_string(), before.clone()));
    }
    params
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<Movie>, CatalogError> {
        let response: DiscoverResponse = self
            .get_json("/discover/movie", &discover_params(query))
            .await?;
        debug!(page = query.page, count = response.results.len(), "discover page fetched");
        Ok(response.results.into_iter().map(MovieDto::into_movie).collect())
    }

    async fn movie_details(&self, movie_id: u64) -> Result<Movie, CatalogError> {
        let params = vec![(
            "append_to_response".to_string(),
            "watch/providers,credits,release_dates".to_string(),
        )];
        let dto: DetailDto = self
            .get_json(&format!("/movie/{movie_id}"), &params)
            .await?;
        Ok(dto.into_movie())
    }
}

// ---- Wire DTOs -------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    results: Vec<MovieDto>,
}

/// Discover list entry: no runtime or provider data yet
#[derive(Debug, Deserialize)]
struct MovieDto {
    id: u64,
    title: String,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
}

impl MovieDto {
    fn into_movie(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            overview: self.overview,
            poster_path: self.poster_path,
            release_date: self.release_date,
            vote_average: self.vote_average,
            runtime: None,
            genres: Vec::new(),
            watch_providers: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreDto {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProviderDto {
    provider_id: u64,
    provider_name: String,
    logo_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionProvidersDto {
    #[serde(default)]
    flatrate: Vec<ProviderDto>,
}

#[derive(Debug, Default, Deserialize)]
struct WatchProvidersDto {
    #[serde(default)]
    results: HashMap<String, RegionProvidersDto>,
}

#[derive(Debug, Deserialize)]
struct DetailDto {
    id: u64,
    title: String,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<GenreDto>,
    #[serde(default, rename = "watch/providers")]
    watch_providers: WatchProvidersDto,
}

impl DetailDto {
    fn into_movie(mut self) -> Movie {
        let providers = self
            .watch_providers
            .results
            .remove(WATCH_REGION)
            .unwrap_or_default()
            .flatrate
            .into_iter()
            .map(|p| WatchProvider {
                id: p.provider_id,
                name: p.provider_name,
                logo_path: p.logo_path,
            })
            .collect();
        Movie {
            id: self.id,
            title: self.title,
            overview: self.overview,
            poster_path: self.poster_path,
            release_date: self.release_date,
            vote_average: self.vote_average,
            runtime: self.runtime,
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            watch_providers: providers,
        }
    }
}
