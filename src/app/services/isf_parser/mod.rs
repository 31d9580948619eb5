//! Stream parser for ISF bulletin files
//!
//! The ISC's ISF format is a fixed-width, multi-record legacy text layout:
//! event headers, origin blocks, and magnitude measure blocks follow each
//! other with nothing but string literals, column titles, and line lengths
//! to tell them apart. This module parses it with a finite-state machine.
//!
//! ## Architecture
//!
//! - [`line_kind`] - line classification (the FSM's input events)
//! - [`fields`] - fixed-column field decoding utilities
//! - [`states`] - parser states, transition table, per-state decoding
//! - [`context`] - per-import agency/origin lookup maps
//! - [`summary`] - import summary and parse-error records
//! - [`importer`] - the orchestration loop with block-level recovery
//!
//! ## Usage
//!
//! ```rust
//! use std::io::BufReader;
//! use isf_catalogue::app::services::isf_parser::{ImportOptions, Importer};
//! use isf_catalogue::app::services::catalogue::MemoryCatalogue;
//!
//! # fn example() -> isf_catalogue::Result<()> {
//! let bulletin = "ISC Bulletin\nSTOP\n";
//! let mut catalogue = MemoryCatalogue::new();
//! let summary = Importer::new(&mut catalogue)
//!     .import(BufReader::new(bulletin.as_bytes()), &ImportOptions::default())?;
//! assert_eq!(summary.event_sources_created, 1);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod fields;
pub mod importer;
pub mod line_kind;
pub mod states;
pub mod summary;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use context::ParseContext;
pub use importer::{ImportOptions, Importer, import_bulletin};
pub use line_kind::{LineKind, classify};
pub use states::{EventContext, ParserState};
pub use summary::{ImportSummary, ParseError, RecordCounts};
