//! Configuration management.
//!
//! The configuration is read once at startup and only read afterwards. It
//! carries the dictionaries used by author-name normalization.
//!
//! # Configuration File Format
//!
//! ```toml
//! [authors]
//! institution_keywords = ["University", "Institute", "Inc"]
//! han_institution_markers = ["大学", "委员会"]
//! han_institution_suffixes = ["网", "局"]
//! extra_surnames = ["东方", "哈"]
//! publisher_keywords = ["Press", "出版社"]
//! strict_segmentation = false
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! Every key may be overridden with a `GBT7714__<SECTION>__<KEY>` environment
//! variable, e.g. `GBT7714__AUTHORS__STRICT_SEGMENTATION=true`.

mod surnames;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use surnames::{
    COMPOUND_SURNAMES, HAN_INSTITUTION_MARKERS, HAN_INSTITUTION_SUFFIXES, INSTITUTION_KEYWORDS,
    PUBLISHER_KEYWORDS, SINGLE_SURNAMES,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Author-name normalization settings
    #[serde(default)]
    pub authors: AuthorsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dictionaries and policy for author-name normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorsConfig {
    /// Latin words that mark an institutional author
    #[serde(default = "default_institution_keywords")]
    pub institution_keywords: Vec<String>,

    /// Han substrings that mark an institutional author
    #[serde(default = "default_han_markers")]
    pub han_institution_markers: Vec<String>,

    /// Han endings that mark an institutional author
    #[serde(default = "default_han_suffixes")]
    pub han_institution_suffixes: Vec<String>,

    /// Surnames appended to the built-in dictionary, ranked after it
    #[serde(default)]
    pub extra_surnames: Vec<String>,

    /// Words that identify a book publisher in APA source clauses
    #[serde(default = "default_publisher_keywords")]
    pub publisher_keywords: Vec<String>,

    /// Fail instead of keeping an unsplittable Han run as one institution
    #[serde(default)]
    pub strict_segmentation: bool,
}

impl Default for AuthorsConfig {
    fn default() -> Self {
        Self {
            institution_keywords: default_institution_keywords(),
            han_institution_markers: default_han_markers(),
            han_institution_suffixes: default_han_suffixes(),
            extra_surnames: Vec::new(),
            publisher_keywords: default_publisher_keywords(),
            strict_segmentation: false,
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_institution_keywords() -> Vec<String> {
    to_strings(INSTITUTION_KEYWORDS)
}

fn default_han_markers() -> Vec<String> {
    to_strings(HAN_INSTITUTION_MARKERS)
}

fn default_han_suffixes() -> Vec<String> {
    to_strings(HAN_INSTITUTION_SUFFIXES)
}

fn default_publisher_keywords() -> Vec<String> {
    to_strings(PUBLISHER_KEYWORDS)
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from a file, layered with `GBT7714__*` environment variables
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("GBT7714")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Locate a configuration file in the default locations
///
/// Checks `./gbt7714.toml`, then `<config_dir>/gbt7714/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("gbt7714.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("gbt7714").join("config.toml"))
        .filter(|path| path.is_file())
}
