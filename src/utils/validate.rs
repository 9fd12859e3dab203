//! Validation and normalization of DOIs, URLs and citation dates.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid DOI format: {0}")]
    InvalidDoi(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

const DOI_PREFIXES: [&str; 6] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "doi:",
];

/// Strip resolver prefixes from a DOI
///
/// Returns `None` when nothing remains. The DOI itself is not checked;
/// use [`validate_doi`] for that.
pub fn normalize_doi(doi: &str) -> Option<String> {
    let mut doi = doi.trim();

    for prefix in DOI_PREFIXES {
        if doi
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        {
            doi = doi[prefix.len()..].trim_start();
            break;
        }
    }

    let doi = doi.trim_end_matches('.').trim();
    if doi.is_empty() {
        None
    } else {
        Some(doi.to_string())
    }
}

/// Validate a DOI, with or without resolver prefix
///
/// Returns the bare DOI on success.
pub fn validate_doi(doi: &str) -> Result<String, ValidationError> {
    let doi = normalize_doi(doi).ok_or_else(|| ValidationError::InvalidDoi("empty DOI".to_string()))?;

    if !doi.starts_with("10.") {
        return Err(ValidationError::InvalidDoi(
            "DOI must start with 10.".to_string(),
        ));
    }

    // DOI must contain a slash after the prefix
    match doi.split_once('/') {
        Some((registrant, suffix)) if registrant.len() > 3 && !suffix.is_empty() => {}
        _ => {
            return Err(ValidationError::InvalidDoi(
                "DOI must contain a slash".to_string(),
            ))
        }
    }

    if doi.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidDoi(
            "DOI contains whitespace".to_string(),
        ));
    }

    Ok(doi)
}

/// Validate a scheme-prefixed URL
///
/// The input is returned trimmed but otherwise verbatim; the parsed form is
/// only used for checking.
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(format!(
            "URL has no host: {}",
            url
        )));
    }

    Ok(url.to_string())
}

/// Validate an ISO-like date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
pub fn validate_date(date: &str) -> Result<String, ValidationError> {
    let date = date.trim();
    let parts: Vec<&str> = date.split('-').collect();

    let valid = match parts.as_slice() {
        [year] => year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()),
        [year, month] => {
            year.len() == 4
                && NaiveDate::parse_from_str(&format!("{}-{}-01", year, month), "%Y-%m-%d").is_ok()
        }
        [year, _, _] => year.len() == 4 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
        _ => false,
    };

    if valid {
        Ok(date.to_string())
    } else {
        Err(ValidationError::InvalidDate(date.to_string()))
    }
}
