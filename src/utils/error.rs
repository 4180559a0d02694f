use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to retrieve {resource}: {message}")]
    RetrievalError { resource: String, message: String },

    #[error("Could not parse '{fragment}': {message}")]
    ParseError { fragment: String, message: String },

    #[error("No birth data for '{name}' in years {start_year}..={end_year}")]
    DataUnavailableError {
        name: String,
        start_year: i32,
        end_year: i32,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn retrieval(resource: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EtlError::RetrievalError {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(fragment: impl Into<String>, message: impl Into<String>) -> Self {
        EtlError::ParseError {
            fragment: fragment.into(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::DataUnavailableError { .. } => ErrorSeverity::Low,
            EtlError::RetrievalError { .. } => ErrorSeverity::Medium,
            EtlError::ParseError { .. }
            | EtlError::CsvError(_)
            | EtlError::ZipError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::IoError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::RetrievalError { .. } => {
                "Check network access, the API key and the configured endpoints, then rerun; cached casts are reused"
            }
            EtlError::ParseError { .. } => {
                "The ranking page layout may have changed; inspect the cached ranking.html"
            }
            EtlError::DataUnavailableError { .. } => {
                "Widen names.start_year/names.end_year or add the missing yobYYYY.txt files"
            }
            EtlError::ZipError(_) | EtlError::CsvError(_) => {
                "Delete the cached names archive so it is downloaded again"
            }
            EtlError::IoError(_) => "Check that the cache and output directories are writable",
            EtlError::SerializationError(_) => "Clear the cast cache directory and rerun",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags"
            }
            EtlError::ProcessingError { .. } => "Rerun with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::RetrievalError { resource, .. } => {
                format!("Could not download {}", resource)
            }
            EtlError::ParseError { fragment, .. } => {
                format!("Unexpected entry on the ranking page: {}", fragment)
            }
            EtlError::MissingConfigError { field } => {
                format!("Missing setting: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
