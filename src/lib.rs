//! ISF Catalogue Importer Library
//!
//! A Rust library for importing seismic event catalogues distributed in the
//! ISC's ISF bulletin format (<http://www.isc.ac.uk/standards/isf/>) into
//! structured catalogue records.
//!
//! This library provides tools for:
//! - Classifying the heterogeneous, positionally-encoded record types of an
//!   ISF bulletin with no delimiters to rely on
//! - Decoding fixed-column origin and magnitude-measure blocks into typed
//!   domain records
//! - Driving a finite-state machine that tracks cross-line context (current
//!   event source, event, origin block metadata)
//! - Recovering from malformed blocks without aborting the whole import
//! - Persisting decoded records through a find-or-create catalogue interface
//!   inside a single transaction

pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod catalogue;
        pub mod isf_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Agency, Event, EventSource, MagnitudeMeasure, Origin, Point};
pub use app::services::catalogue::{Catalogue, CatalogueError, MemoryCatalogue};
pub use app::services::isf_parser::{ImportOptions, ImportSummary, Importer, ParseError};

/// Result type alias for the ISF catalogue importer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ISF bulletin import operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O failure while reading the bulletin stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The current parser state does not accept the classified line kind
    #[error("unexpected {line_kind} line in state {state}")]
    InvalidTransition {
        state: &'static str,
        line_kind: &'static str,
    },

    /// A fixed-column or pattern decode failed, or a decoded value violated
    /// an expected invariant
    #[error("field decoding error: {message}")]
    FieldDecoding { message: String },

    /// A measure line referenced an origin id that no origin block in the
    /// current event established
    #[error("measure references unknown origin '{source_key}'")]
    UnknownOrigin { source_key: String },

    /// The persistence collaborator failed; a `Conflict` here is fatal to
    /// the whole import
    #[error("catalogue error: {0}")]
    Catalogue(#[from] app::services::catalogue::CatalogueError),

    /// Fatal import failure carrying the offending line number. Raised only
    /// on persistence conflicts; recoverable conditions are recorded in the
    /// import summary instead.
    #[error(
        "line {line} violates the ISF format, please check the format \
         documentation at: {url}",
        url = constants::ISF_FORMAT_URL
    )]
    ParsingFailure { line: usize },

    /// Configuration error from the CLI surface
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an invalid-transition error
    pub fn invalid_transition(state: &'static str, line_kind: &'static str) -> Self {
        Self::InvalidTransition { state, line_kind }
    }

    /// Create a field decoding error
    pub fn field_decoding(message: impl Into<String>) -> Self {
        Self::FieldDecoding {
            message: message.into(),
        }
    }

    /// Create an unknown-origin error
    pub fn unknown_origin(source_key: impl Into<String>) -> Self {
        Self::UnknownOrigin {
            source_key: source_key.into(),
        }
    }

    /// Create a fatal parsing failure for the given 1-based line number
    pub fn parsing_failure(line: usize) -> Self {
        Self::ParsingFailure { line }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for conditions the importer absorbs via block-level recovery,
    /// false for conditions that must abort the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::FieldDecoding { .. }
                | Self::UnknownOrigin { .. }
        )
    }
}
