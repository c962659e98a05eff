use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use validator::ValidateUrl;

use crate::error::ApiError;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;
pub const MAX_SEARCH_LEN: usize = 100;

/// Validate that a required text field is within `min..=max` characters
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();

    if len < min {
        return Err(if min == 1 {
            ApiError::Validation(format!("{field} is required"))
        } else {
            ApiError::Validation(format!("{field} must be at least {min} characters long"))
        });
    }

    if len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters long"
        )));
    }

    Ok(())
}

pub fn validate_max_length(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ApiError> {
    match value {
        Some(value) => validate_length(field, value, 0, max),
        None => Ok(()),
    }
}

/// Validate a `#RRGGBB` color
pub fn validate_color(color: &str) -> Result<(), ApiError> {
    if !HEX_COLOR.is_match(color) {
        return Err(ApiError::Validation(format!(
            "color must be a hex color like #3B82F6, got '{color}'"
        )));
    }
    Ok(())
}

/// Validate an optional media URL
pub fn validate_url(field: &str, url: Option<&str>) -> Result<(), ApiError> {
    let Some(url) = url else {
        return Ok(());
    };

    if url.len() > 2048 {
        return Err(ApiError::Validation(format!("{field} is too long")));
    }

    if !url.validate_url() {
        return Err(ApiError::Validation(format!("{field} must be a valid URL")));
    }

    Ok(())
}

/// Validate pagination parameters, applying the default limit
pub fn validate_pagination(limit: Option<i64>, offset: Option<i64>) -> Result<(i64, i64), ApiError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = offset.unwrap_or(0);

    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }

    if offset < 0 {
        return Err(ApiError::Validation(
            "offset must be greater than or equal to 0".to_string(),
        ));
    }

    Ok((limit, offset))
}

/// Normalize a search term: trimmed, empty means no search
pub fn validate_search(search: Option<&str>) -> Result<Option<String>, ApiError> {
    let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    validate_length("search", search, 1, MAX_SEARCH_LEN)?;
    Ok(Some(search.to_string()))
}

/// Parse an ISO-8601 date parameter
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates, which are taken
/// as midnight UTC.
///
/// # Examples
/// ```
/// use tp_api::validation::parse_date_param;
///
/// assert!(parse_date_param("startDate", "2024-01-15").is_ok());
/// assert!(parse_date_param("startDate", "2024-01-15T10:30:00Z").is_ok());
/// assert!(parse_date_param("startDate", "yesterday").is_err());
/// ```
pub fn parse_date_param(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| ApiError::Validation(format!("{field} must be an ISO-8601 date")))
}
