//! Citation rendering.
//!
//! Two fixed outputs are supported: a GB/T 7714-2015 sequential-code
//! string and a LaTeX `\bibitem` entry wrapping that string.

mod bibitem;
mod gbt;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use bibitem::{default_key, format_bibitem};
pub use gbt::format_gbt;

use crate::models::Citation;

/// Output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// GB/T 7714-2015 reference string
    Gbt,
    /// `\bibitem{key} ...`
    Bibitem,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Gbt => write!(f, "gbt"),
            OutputMode::Bibitem => write!(f, "bibitem"),
        }
    }
}

/// Format a citation in the specified mode
///
/// `key` only applies to [`OutputMode::Bibitem`] and takes precedence over
/// the citation's own key.
pub fn format(citation: &Citation, mode: OutputMode, key: Option<&str>) -> String {
    match mode {
        OutputMode::Gbt => format_gbt(citation),
        OutputMode::Bibitem => format_bibitem(citation, key),
    }
}
