//! Remote catalog enrichment via TMDB.
//!
//! Optional: the orchestrator only consults the catalog when an API key is
//! configured, and every failure here is non-fatal for the release.

use chrono::Datelike;
use reelsort_model::MediaMetadata;
use tmdb_api::client::Client;
use tmdb_api::client::reqwest::ReqwestExecutor;
use tmdb_api::movie::details::MovieDetails;
use tmdb_api::movie::search::MovieSearch;
use tmdb_api::prelude::Command;
use tmdb_api::tvshow::episode::details::TVShowEpisodeDetails;
use tmdb_api::tvshow::search::TVShowSearch;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Thin wrapper over the TMDB command API.
pub struct TmdbClient {
    client: Client<ReqwestExecutor>,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient").finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::<ReqwestExecutor>::new(api_key),
        }
    }

    /// Search for a movie by title and optional year; returns the TMDB id
    /// of the first (most relevant) match.
    pub async fn search_movie(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Option<u64>, ProviderError> {
        let search = MovieSearch::new(title.to_string());
        let search = MovieSearch::with_year(search, year);
        let results = search
            .execute(&self.client)
            .await
            .map_err(|err| ProviderError::ApiError(err.to_string()))?;
        let id = results.results.first().map(|movie| movie.inner.id);
        if id.is_none() {
            debug!(title, ?year, "no TMDB movie results");
        }
        Ok(id)
    }

    /// Fetch movie details and map them onto the metadata record.
    pub async fn movie_metadata(
        &self,
        tmdb_id: u64,
    ) -> Result<MediaMetadata, ProviderError> {
        let details = MovieDetails::new(tmdb_id)
            .execute(&self.client)
            .await
            .map_err(|err| ProviderError::ApiError(err.to_string()))?;

        let mut metadata = MediaMetadata {
            title: Some(details.inner.title.clone()),
            original_title: Some(details.inner.original_title.clone()),
            tmdb_id: Some(details.inner.id.to_string()),
            rating: Some(format!("{:.1}", details.inner.vote_average)),
            genres: details
                .genres
                .iter()
                .map(|genre| genre.name.clone())
                .collect(),
            ..MediaMetadata::default()
        };
        metadata.year = details
            .inner
            .release_date
            .as_ref()
            .map(|date| date.year().to_string());
        if !details.inner.overview.is_empty() {
            metadata.plot = Some(details.inner.overview.clone());
        }
        Ok(metadata)
    }

    /// Search for a TV show by name.
    pub async fn search_tv_show(
        &self,
        name: &str,
    ) -> Result<Option<u64>, ProviderError> {
        let search = TVShowSearch::new(name.to_string());
        let results = search
            .execute(&self.client)
            .await
            .map_err(|err| ProviderError::ApiError(err.to_string()))?;
        let id = results.results.first().map(|show| show.inner.id);
        if id.is_none() {
            debug!(name, "no TMDB series results");
        }
        Ok(id)
    }

    /// Fetch episode details and map them onto the metadata record.
    pub async fn episode_metadata(
        &self,
        series_id: u64,
        season: u64,
        episode: u64,
    ) -> Result<MediaMetadata, ProviderError> {
        let details = TVShowEpisodeDetails::new(series_id, season, episode)
            .execute(&self.client)
            .await
            .map_err(|err| ProviderError::ApiError(err.to_string()))?;

        let mut metadata = MediaMetadata {
            title: Some(details.inner.name.clone()),
            tmdb_id: Some(details.inner.id.to_string()),
            rating: Some(format!("{:.1}", details.inner.vote_average)),
            ..MediaMetadata::default()
        };
        metadata.year = details
            .inner
            .air_date
            .as_ref()
            .map(|date| date.to_string());
        metadata.plot = details.inner.overview.clone();
        Ok(metadata)
    }
}

/// Overlay remote fields onto locally parsed metadata. Catalog values win
/// for the fields they carry; everything else stays as parsed.
pub fn merge_metadata(
    local: &MediaMetadata,
    remote: MediaMetadata,
) -> MediaMetadata {
    let mut merged = local.clone();
    if remote.title.is_some() {
        merged.title = remote.title;
    }
    if remote.original_title.is_some() {
        merged.original_title = remote.original_title;
    }
    if remote.year.is_some() {
        merged.year = remote.year;
    }
    if remote.rating.is_some() {
        merged.rating = remote.rating;
    }
    if remote.plot.is_some() {
        merged.plot = remote.plot;
    }
    if remote.tmdb_id.is_some() {
        merged.tmdb_id = remote.tmdb_id;
    }
    if !remote.genres.is_empty() {
        merged.genres = remote.genres;
    }
    merged
}
