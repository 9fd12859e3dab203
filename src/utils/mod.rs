//! Utility modules supporting parsing and formatting.
//!
//! - [`normalize_doi`]: Strip `https://doi.org/` and similar prefixes from a DOI
//! - [`validate_doi`], [`validate_url`], [`validate_date`]: Field checks used by the parsers
//! - [`text`]: Han-script detection, ASCII folding and TeX cleanup
//!
//! # DOI normalization
//!
//! ```rust
//! use gbt7714::utils::normalize_doi;
//!
//! assert_eq!(normalize_doi("https://doi.org/10.1234/x").as_deref(), Some("10.1234/x"));
//! assert_eq!(normalize_doi("10.1234/x").as_deref(), Some("10.1234/x"));
//! ```

pub mod text;
mod validate;

pub use validate::{normalize_doi, validate_date, validate_doi, validate_url, ValidationError};
