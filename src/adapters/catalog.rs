use crate::adapters::http::HttpFetcher;
use crate::adapters::metadata::MetadataClient;
use crate::adapters::ranking::parse_ranking;
use crate::core::{CastStore, CreditedRole, FilmCatalog, FilmRef, Storage};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

const RANKING_CACHE_FILE: &str = "ranking.html";

/// Film catalog backed by the ranking page and the metadata API.
///
/// The ranking HTML is cached in `page_cache`; casts go through `store`.
/// Within one run each distinct film is fetched at most once, even when
/// several callers ask for it concurrently.
pub struct HttpFilmCatalog<S: Storage, K: CastStore> {
    fetcher: HttpFetcher,
    ranking_url: String,
    metadata: MetadataClient,
    page_cache: S,
    store: K,
    casts: Mutex<HashMap<String, Arc<OnceCell<Vec<CreditedRole>>>>>,
}

impl<S: Storage, K: CastStore> HttpFilmCatalog<S, K> {
    pub fn new(
        fetcher: HttpFetcher,
        ranking_url: impl Into<String>,
        metadata: MetadataClient,
        page_cache: S,
        store: K,
    ) -> Self {
        Self {
            fetcher,
            ranking_url: ranking_url.into(),
            metadata,
            page_cache,
            store,
            casts: Mutex::new(HashMap::new()),
        }
    }

    async fn ranking_html(&self) -> Result<String> {
        if self.page_cache.exists(RANKING_CACHE_FILE).await {
            tracing::debug!("Using cached {}", RANKING_CACHE_FILE);
            let data = self.page_cache.read_file(RANKING_CACHE_FILE).await?;
            return String::from_utf8(data).map_err(|e| EtlError::ProcessingError {
                message: format!("cached {} is not UTF-8: {}", RANKING_CACHE_FILE, e),
            });
        }

        tracing::info!("Downloading ranking page {}", self.ranking_url);
        let html = self.fetcher.get_text(&self.ranking_url, &[]).await?;
        self.page_cache
            .write_file(RANKING_CACHE_FILE, html.as_bytes())
            .await?;
        Ok(html)
    }

    async fn cell_for(&self, key: &str) -> Arc<OnceCell<Vec<CreditedRole>>> {
        let mut casts = self.casts.lock().await;
        casts.entry(key.to_string()).or_default().clone()
    }

    async fn load_or_fetch(&self, film: &FilmRef, key: &str) -> Result<Vec<CreditedRole>> {
        if let Some(cast) = self.store.load(key).await? {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cast);
        }

        tracing::info!("Fetching cast for {}", film);
        let cast = self.metadata.fetch_cast(film).await?;
        self.store.save(key, &cast).await?;
        Ok(cast)
    }
}

#[async_trait]
impl<S: Storage, K: CastStore> FilmCatalog for HttpFilmCatalog<S, K> {
    async fn list_top_films(&self) -> Result<Vec<FilmRef>> {
        let html = self.ranking_html().await?;
        let films = parse_ranking(&html)?;
        tracing::info!("Ranking lists {} films", films.len());
        Ok(films)
    }

    async fn get_cast(&self, film: &FilmRef) -> Result<Vec<CreditedRole>> {
        let key = film.cache_key();
        let cell = self.cell_for(&key).await;
        let cast = cell
            .get_or_try_init(|| self.load_or_fetch(film, &key))
            .await?;
        Ok(cast.clone())
    }
}
