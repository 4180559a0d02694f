use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(field, value, "URL cannot be empty"));
    }
    let url = Url::parse(value)
        .map_err(|e| invalid(field, value, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, value, format!("Unsupported URL scheme: {}", scheme))),
    }
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(field, value, format!("Value must be at least {}", min_value)));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field.to_string(),
    })
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// Inclusive bounds check.
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

/// SSA birth records start in 1880.
pub fn validate_year_range(field: &str, start_year: i32, end_year: i32) -> Result<()> {
    validate_range(field, start_year, 1880, 2100)?;
    validate_range(field, end_year, 1880, 2100)?;
    if start_year > end_year {
        return Err(invalid(
            field,
            format!("{}..={}", start_year, end_year),
            "start year is after end year",
        ));
    }
    Ok(())
}

pub fn validate_output_formats(field: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    if formats.is_empty() {
        return Err(invalid(field, "", "At least one output format is required"));
    }
    match formats.iter().find(|f| !allowed.contains(&f.as_str())) {
        Some(unknown) => Err(invalid(
            field,
            unknown,
            format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("ranking.url", "https://www.filmsite.org/boxoffice3.html").is_ok());
        assert!(validate_url("metadata.endpoint", "http://localhost:8080/3").is_ok());
        assert!(validate_url("ranking.url", "").is_err());
        assert!(validate_url("ranking.url", "invalid-url").is_err());
        assert!(validate_url("ranking.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("extract.max_chars_per_movie", 5, 1).is_ok());
        assert!(validate_positive_number("extract.max_chars_per_movie", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_is_inclusive() {
        assert!(validate_range("extract.popularity_window", 1u32, 1, 150).is_ok());
        assert!(validate_range("extract.popularity_window", 150u32, 1, 150).is_ok());
        match validate_range("extract.popularity_window", 3_000_000_000u32, 1, 150) {
            Err(EtlError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "extract.popularity_window");
                assert_eq!(value, "3000000000");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_year_range() {
        assert!(validate_year_range("names", 1880, 2017).is_ok());
        assert!(validate_year_range("names", 1990, 1990).is_ok());
        assert!(validate_year_range("names", 2000, 1990).is_err());
        assert!(validate_year_range("names", 1700, 1990).is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_output_formats("load.output_formats", &formats, &["csv", "json"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_output_formats("load.output_formats", &invalid, &["csv", "json"]).is_err());
        assert!(validate_output_formats("load.output_formats", &[], &["csv", "json"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("metadata.api_key", &missing),
            Err(EtlError::MissingConfigError { .. })
        ));
        let present = Some("k".to_string());
        assert_eq!(validate_required_field("metadata.api_key", &present).unwrap(), "k");
    }
}
