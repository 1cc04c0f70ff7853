//! Core library: folder scanning, hashing, archive inspection, PLR scoring,
//! batch organizing and extraction.

pub mod analyzer;
pub mod archive;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod extractor;
pub mod models;
pub mod organizer;
pub mod paths;
pub mod scanner;
pub mod scorer;
pub mod sniffer;
pub mod vocab;

pub use error::{PlrError, PlrResult};
