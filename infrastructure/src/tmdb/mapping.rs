//! Slug-to-TMDB-id mappings
//!
//! The domain and the deck builder speak in questionnaire slugs; only
//! this adapter knows the catalog's numeric ids. Unknown slugs map to
//! `None` and are skipped by the query builder.

/// TMDB watch-provider id for a streaming service slug
pub fn provider_id(slug: &str) -> Option<u64> {
    match slug {
        "netflix" => Some(8),
        "prime" => Some(9),
        "hulu" => Some(15),
        "disney" => Some(337),
        _ => None,
    }
}

/// TMDB genre id for a questionnaire genre slug
pub fn genre_id(slug: &str) -> Option<u64> {
    match slug {
        "action" => Some(28),
        "comedy" => Some(35),
        "drama" => Some(18),
        "horror" => Some(27),
        "romance" => Some(10749),
        "science_fiction" => Some(878),
        "fantasy" => Some(14),
        "thriller" => Some(53),
        // Used by the mood-derived query bundles
        "family" => Some(10751),
        "documentary" => Some(99),
        _ => None,
    }
}

/// Join mapped ids with TMDB's OR separator, skipping unknown slugs.
/// Returns `None` when nothing mapped.
pub fn join_ids(slugs: &[String], map: fn(&str) -> Option<u64>) -> Option<String> {
    let ids: Vec<String> = slugs
        .iter()
        .filter_map(|s| map(s))
        .map(|id| id.to_string())
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids.join("|"))
    }
}
