//! ABIF Decoder Library
//!
//! A read-only decoder for ABIF, the tag-indexed binary container format
//! that genetic analyzers write their trace data in. An ABIF file is
//! self-describing: a fixed header points at a directory of entries, each
//! naming a field ("tag") and describing where its bytes live and how to
//! decode them.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Parses the header and directory into an in-memory tag index
//! - Resolves a tag to its raw bytes (stored inline or at a file offset)
//! - Decodes bytes per the element type table (integers, floats, packed
//!   dates and times, Pascal/C strings, legacy thumbprints)
//!
//! The library does NOT:
//! - Interpret particular tags (e.g. render a base-call array as text)
//! - Cache decoded values
//! - Validate file structure beyond the fields it reads
//! - Write or mutate files
//!
//! Tag-specific interpretation belongs in the application layer (abif-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use abif_decoder::{Reader, Tag};
//! use std::path::Path;
//!
//! let mut reader = Reader::open(Path::new("sample.ab1")).unwrap();
//!
//! let mut tags = reader.tags();
//! tags.sort();
//! for tag in tags {
//!     match reader.value(tag) {
//!         Ok(value) => println!("{}: {}", tag, value),
//!         Err(e) => println!("{}: {}", tag, e),
//!     }
//! }
//!
//! // Or fetch one known field directly
//! let bases = reader.value(Tag::new(*b"PBAS", 1)).unwrap();
//! ```

// Public modules
pub mod reader;
pub mod types;

// Re-export main types for convenience
pub use reader::Reader;
pub use types::{AbifError, Result, Tag, TagParseError, Thumb, Value};

// Internal modules (not exposed in public API)
mod directory;
mod typetable;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
