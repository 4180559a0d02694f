use crate::adapters::http::HttpFetcher;
use crate::domain::model::{CreditedRole, FilmRef};
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    #[serde(default)]
    character: Option<String>,
}

/// Client for a TMDb-style movie metadata API.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    fetcher: HttpFetcher,
    endpoint: String,
    api_key: String,
}

impl MetadataClient {
    pub fn new(fetcher: HttpFetcher, endpoint: &str, api_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Cast credits for `film`, in the provider's billing order.
    pub async fn fetch_cast(&self, film: &FilmRef) -> Result<Vec<CreditedRole>> {
        let movie_id = self.find_movie_id(film).await?;
        let url = format!("{}/movie/{}/credits", self.endpoint, movie_id);
        let credits: CreditsResponse = self
            .fetcher
            .get_json(&url, &[("api_key", self.api_key.as_str())])
            .await?;

        tracing::debug!("{}: {} credits", film, credits.cast.len());
        Ok(credits
            .cast
            .into_iter()
            .map(|member| CreditedRole::new(member.character.unwrap_or_default()))
            .collect())
    }

    // Release years on ranking pages sometimes disagree with the provider,
    // so a miss with the year falls back to a title-only search.
    async fn find_movie_id(&self, film: &FilmRef) -> Result<u64> {
        let url = format!("{}/search/movie", self.endpoint);
        let year = film.release_year.to_string();

        let with_year: SearchResponse = self
            .fetcher
            .get_json(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("query", film.title.as_str()),
                    ("year", year.as_str()),
                ],
            )
            .await?;
        if let Some(result) = with_year.results.first() {
            return Ok(result.id);
        }

        tracing::debug!("No match for {} with year, retrying by title", film);
        let by_title: SearchResponse = self
            .fetcher
            .get_json(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("query", film.title.as_str()),
                ],
            )
            .await?;
        by_title
            .results
            .first()
            .map(|result| result.id)
            .ok_or_else(|| EtlError::retrieval(url, format!("no metadata match for {}", film)))
    }
}
