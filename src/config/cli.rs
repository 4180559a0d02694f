use crate::config::validate_settings;
use crate::core::ConfigProvider;
use crate::domain::ports::HttpSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "movie-names")]
#[command(about = "Compare baby-name popularity before and after hit films")]
pub struct CliConfig {
    #[arg(long, help = "Read settings from a TOML file instead of flags")]
    #[serde(skip)]
    pub config: Option<String>,

    #[arg(long, default_value = super::DEFAULT_RANKING_URL)]
    pub ranking_url: String,

    #[arg(long, default_value = super::DEFAULT_METADATA_ENDPOINT)]
    pub metadata_endpoint: String,

    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    #[arg(long, default_value = "./names", help = "Directory of yobYYYY.txt files or names.zip")]
    pub names_source: String,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = super::DEFAULT_NAMES_URL,
        help = "Download names.zip to --names-source when it does not exist (bare flag: SSA archive)"
    )]
    pub names_url: Option<String>,

    #[arg(long, default_value_t = super::DEFAULT_START_YEAR)]
    pub start_year: i32,

    #[arg(long, default_value_t = super::DEFAULT_END_YEAR)]
    pub end_year: i32,

    #[arg(long, default_value_t = super::DEFAULT_MAX_CHARS_PER_MOVIE)]
    pub max_chars_per_movie: usize,

    #[arg(long, default_value_t = super::DEFAULT_POPULARITY_WINDOW)]
    pub popularity_window: u32,

    #[arg(long, default_value_t = super::DEFAULT_CONCURRENT_REQUESTS)]
    pub concurrent_requests: usize,

    #[arg(long, default_value = "./cache")]
    pub cache_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub output_formats: Vec<String>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "2")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "500")]
    pub retry_delay_ms: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn ranking_url(&self) -> &str {
        &self.ranking_url
    }

    fn metadata_endpoint(&self) -> &str {
        &self.metadata_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn names_source(&self) -> &str {
        &self.names_source
    }

    fn names_url(&self) -> Option<&str> {
        self.names_url.as_deref()
    }

    fn start_year(&self) -> i32 {
        self.start_year
    }

    fn end_year(&self) -> i32 {
        self.end_year
    }

    fn max_chars_per_movie(&self) -> usize {
        self.max_chars_per_movie
    }

    fn popularity_window(&self) -> u32 {
        self.popularity_window
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn cache_dir(&self) -> &str {
        &self.cache_dir
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout_seconds),
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_required_field("api_key (--api-key or TMDB_API_KEY)", &self.api_key)?;
        validate_settings(self)
    }
}
