//! # gbt7714
//!
//! Normalizes bibliographic citations written in mixed input styles into a
//! single citation model, then renders that model as a GB/T 7714-2015
//! reference string or a LaTeX `\bibitem` entry.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`parsers`]: Format detection, the BibTeX, APA, web and GB/T parsers,
//!   and author-name normalization
//! - [`models`]: The canonical citation model
//! - [`formatters`]: GB/T 7714 and bibitem output
//! - [`utils`]: DOI, URL and date validation plus script helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```
//! use gbt7714::{format, parse, OutputMode};
//!
//! let raw = "@article{smith2021, author = {Smith, John}, title = {A method},
//!            journal = {Journal of Results}, year = {2021}, volume = {15}, pages = {1--9}}";
//! let citation = parse(raw).unwrap();
//! assert_eq!(
//!     format(&citation, OutputMode::Gbt, None),
//!     "Smith J. A method[J]. Journal of Results, 2021, 15: 1-9."
//! );
//! ```

pub mod config;
pub mod formatters;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use formatters::{format, OutputMode};
pub use models::{Author, Citation, CitationBuilder, EntryType};
pub use parsers::{parse, CitationParser, InputFormat, ParseError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
