//! Reading, editing, and writing MCNP input decks
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod core;
mod document;
mod edit;
mod error;
mod graph;
mod parsers;
mod reader;
mod writer;

pub mod lexer;

use std::path::Path;

// flatten public API and inline the documentation
#[doc(inline)]
pub use crate::core::*;

#[doc(inline)]
pub use document::Document;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use graph::{CrossReferenceGraph, UniverseCycle};

#[doc(inline)]
pub use parsers::{parse_int, parse_real};

#[doc(inline)]
pub use writer::{serialize, Writer};

/// Parse the full text of an input deck
///
/// Structural problems (no title, fewer than three blocks) are errors. Any
/// card that can not be read is skipped and recorded in
/// [Document::diagnostics] instead.
///
/// ```rust
/// # use mcdeck_input::parse;
/// let doc = parse("title\n1 0 -1\n\n1 so 1\n\nnps 10\n").unwrap();
/// assert_eq!(doc.cells().len(), 1);
/// assert!(parse("title\n1 0 -1\n").is_err());
/// ```
pub fn parse(text: &str) -> Result<Document> {
    Document::from_str(text)
}

/// Read and parse an input deck from a file
///
/// The whole file is read into memory before parsing. Text that is not
/// valid UTF-8 fails with [Error::InvalidEncoding].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    Document::from_file(path)
}

/// Build a fresh cross-reference graph for a document
///
/// Same as [Document::cross_reference_graph] without the caching.
pub fn cross_reference_graph(document: &Document) -> CrossReferenceGraph {
    CrossReferenceGraph::build(document)
}
