//! Import summary and per-line counting structures
//!
//! The summary is the caller-visible outcome of an import run: how many
//! records of each kind were newly created, and the ordered list of
//! recoverable parse errors. It is mutated only by the importer and is never
//! rolled back, even when the persistence transaction is.

use serde::Serialize;
use std::fmt;

/// A recoverable parse error recorded against a bulletin line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// 1-based line number in the input stream
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Newly-created record counts produced by decoding a single line.
/// Merged into the running [`ImportSummary`] by the importer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub event_sources: usize,
    pub agencies: usize,
    pub events: usize,
    pub origins: usize,
    pub measures: usize,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Event sources newly created during the run
    pub event_sources_created: usize,

    /// Agencies newly created during the run
    pub agencies_created: usize,

    /// Events newly created during the run
    pub events_created: usize,

    /// Origins newly created during the run
    pub origins_created: usize,

    /// Magnitude measures newly created during the run
    pub measures_created: usize,

    /// Recoverable parse errors, in input order
    pub errors: Vec<ParseError>,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the per-line counts of one decoded line
    pub fn absorb(&mut self, counts: RecordCounts) {
        self.event_sources_created += counts.event_sources;
        self.agencies_created += counts.agencies;
        self.events_created += counts.events;
        self.origins_created += counts.origins;
        self.measures_created += counts.measures;
    }

    /// Append a recoverable parse error
    pub fn record_error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(ParseError {
            line,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total records created across all entity kinds
    pub fn total_created(&self) -> usize {
        self.event_sources_created
            + self.agencies_created
            + self.events_created
            + self.origins_created
            + self.measures_created
    }
}
