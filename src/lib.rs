//! # dxi - Doxygen search-index toolkit
//!
//! dxi loads the client-side search index of generated HTML documentation
//! (the `search/*.js` shard files) into a typed model and provides query,
//! validation, statistics, merge, and round-trip re-serialization on top
//! of it.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Shard parsing, loading, validation, merge, and writing
//! - [`query`] - Query parsing, matching, and ranking
//! - [`output`] - Result formatting for the terminal
//! - [`utils`] - Escaping codecs (search keys, page slugs, HTML entities)
//!
//! ## Quick Start
//!
//! ```ignore
//! use dxi::index::load_index;
//! use dxi::query::{QueryExecutor, parse_query};
//! use std::path::Path;
//!
//! // Load a generated search directory
//! let index = load_index(Path::new("docs/html/search"))?;
//!
//! // Parse and execute a query
//! let query = parse_query("section:functions make_address");
//! let executor = QueryExecutor::new(&index);
//! let matches = executor.execute(&query)?;
//!
//! for m in matches {
//!     println!("{} ({} sites)", m.record.name, m.record.occurrences.len());
//! }
//! ```
//!
//! ## Index format
//!
//! Each shard file holds a single `var searchData=[...]` array literal
//! mapping escaped symbol keys (`make_5faddress`) to display names and
//! occurrence lists of `['../page.html#anchor',1,'qualified label']`
//! triples. The format belongs to the documentation viewer; dxi reads and
//! writes it byte-compatibly and treats the records as immutable.

pub mod index;
pub mod output;
pub mod query;
pub mod utils;
