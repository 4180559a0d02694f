use crate::domain::model::{CreditedRole, FilmCast, FilmRef, Report};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn ranking_url(&self) -> &str;
    fn metadata_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn names_source(&self) -> &str;
    fn names_url(&self) -> Option<&str>;
    fn start_year(&self) -> i32;
    fn end_year(&self) -> i32;
    fn max_chars_per_movie(&self) -> usize;
    fn popularity_window(&self) -> u32;
    fn concurrent_requests(&self) -> usize;
    fn cache_dir(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn http_settings(&self) -> HttpSettings;
}

/// Source of ranked films and their cast credits.
#[async_trait]
pub trait FilmCatalog: Send + Sync {
    async fn list_top_films(&self) -> Result<Vec<FilmRef>>;
    async fn get_cast(&self, film: &FilmRef) -> Result<Vec<CreditedRole>>;
}

/// Key-value store of cast payloads, keyed by `FilmRef::cache_key`.
#[async_trait]
pub trait CastStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Vec<CreditedRole>>>;
    async fn save(&self, key: &str, cast: &[CreditedRole]) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<FilmCast>>;
    async fn transform(&self, data: Vec<FilmCast>) -> Result<Report>;
    async fn load(&self, report: Report) -> Result<String>;
}
