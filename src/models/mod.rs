//! Core data model for a parsed reference.

mod citation;

pub use citation::{Author, Citation, CitationBuilder, EntryType};
