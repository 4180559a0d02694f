use crate::config::{
    validate_settings, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_MAX_CHARS_PER_MOVIE,
    DEFAULT_METADATA_ENDPOINT, DEFAULT_POPULARITY_WINDOW, DEFAULT_RANKING_URL,
};
use crate::core::ConfigProvider;
use crate::domain::ports::HttpSettings;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("env var regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub ranking: RankingConfig,
    pub metadata: MetadataConfig,
    pub names: NamesConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub url: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RANKING_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamesConfig {
    pub source: String,
    pub download_url: Option<String>,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub max_chars_per_movie: Option<usize>,
    pub popularity_window: Option<u32>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub cache_dir: Option<String>,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

impl TomlConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn ranking_url(&self) -> &str {
        &self.ranking.url
    }

    fn metadata_endpoint(&self) -> &str {
        self.metadata
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_ENDPOINT)
    }

    fn api_key(&self) -> Option<&str> {
        self.metadata.api_key.as_deref()
    }

    fn names_source(&self) -> &str {
        &self.names.source
    }

    fn names_url(&self) -> Option<&str> {
        self.names.download_url.as_deref()
    }

    fn start_year(&self) -> i32 {
        self.names.start_year
    }

    fn end_year(&self) -> i32 {
        self.names.end_year
    }

    fn max_chars_per_movie(&self) -> usize {
        self.extract
            .max_chars_per_movie
            .unwrap_or(DEFAULT_MAX_CHARS_PER_MOVIE)
    }

    fn popularity_window(&self) -> u32 {
        self.extract
            .popularity_window
            .unwrap_or(DEFAULT_POPULARITY_WINDOW)
    }

    fn concurrent_requests(&self) -> usize {
        self.extract
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn cache_dir(&self) -> &str {
        self.load.cache_dir.as_deref().unwrap_or("./cache")
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        HttpSettings {
            timeout: self
                .metadata
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retry_attempts: self
                .metadata
                .retry_attempts
                .unwrap_or(defaults.retry_attempts),
            retry_delay: self
                .metadata
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let api_key = validate_required_field("metadata.api_key", &self.metadata.api_key)?;
        // placeholder left in place when the variable is not set
        if api_key.starts_with("${") {
            return Err(EtlError::MissingConfigError {
                field: format!("metadata.api_key ({} is not set)", api_key),
            });
        }
        validate_settings(self)
    }
}
