#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, validate_positive_number,
    validate_range, validate_url, validate_year_range,
};

pub const DEFAULT_RANKING_URL: &str = "https://www.filmsite.org/boxoffice3.html";
pub const DEFAULT_METADATA_ENDPOINT: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_NAMES_URL: &str = "https://www.ssa.gov/oact/babynames/names.zip";
pub const DEFAULT_START_YEAR: i32 = 1880;
pub const DEFAULT_END_YEAR: i32 = 2017;
pub const DEFAULT_MAX_CHARS_PER_MOVIE: usize = 5;
pub const DEFAULT_POPULARITY_WINDOW: u32 = 1;
pub const MAX_POPULARITY_WINDOW: u32 = 150;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;
pub const OUTPUT_FORMATS: &[&str] = &["csv", "json"];

/// Checks shared by every configuration source.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("ranking.url", config.ranking_url())?;
    validate_url("metadata.endpoint", config.metadata_endpoint())?;
    if let Some(url) = config.names_url() {
        validate_url("names.download_url", url)?;
    }
    if let Some(key) = config.api_key() {
        validate_non_empty_string("metadata.api_key", key)?;
    }

    validate_path("names.source", config.names_source())?;
    validate_path("load.cache_dir", config.cache_dir())?;
    validate_path("load.output_path", config.output_path())?;
    validate_year_range("names.start_year", config.start_year(), config.end_year())?;

    validate_positive_number("extract.max_chars_per_movie", config.max_chars_per_movie(), 1)?;
    validate_range(
        "extract.popularity_window",
        config.popularity_window(),
        1,
        MAX_POPULARITY_WINDOW,
    )?;
    validate_positive_number("extract.concurrent_requests", config.concurrent_requests(), 1)?;
    validate_output_formats("load.output_formats", config.output_formats(), OUTPUT_FORMATS)?;

    Ok(())
}
