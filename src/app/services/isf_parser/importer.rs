//! Import orchestration: the line-by-line driver with recovery policy
//!
//! The importer reads the bulletin stream, classifies each line, performs
//! the state transition, dispatches decoding to the entered state, and
//! aggregates the summary. Malformed blocks trigger block-level recovery
//! (reset to `Start`, record the error, keep going); only a persistence
//! conflict aborts the run, after rolling the transaction back.

use std::io::BufRead;

use tracing::{debug, info, warn};

use super::context::ParseContext;
use super::line_kind::{LineKind, classify};
use super::states::{self, ParserState};
use super::summary::{ImportSummary, RecordCounts};
use crate::app::models::EventSourceId;
use crate::app::services::catalogue::Catalogue;
use crate::constants::ISF_FORMAT_URL;
use crate::{Error, Result};

/// Behavior switches for an import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Silently skip unrecognized lines while no catalogue header has been
    /// seen yet. Bulletins routinely open with banner boilerplate; disable
    /// this to have such lines recorded as parse errors instead.
    pub allow_junk: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { allow_junk: true }
    }
}

/// Drives one import of an ISF bulletin stream into a catalogue.
///
/// The parser state, lookup context, and summary live for exactly one call
/// to [`Importer::import`]; a new run starts from a fresh importer.
pub struct Importer<'c, C: Catalogue + ?Sized> {
    catalogue: &'c mut C,
    state: ParserState,
    context: ParseContext,
    event_source: Option<EventSourceId>,
    summary: ImportSummary,
}

impl<'c, C: Catalogue + ?Sized> Importer<'c, C> {
    pub fn new(catalogue: &'c mut C) -> Self {
        Self {
            catalogue,
            state: ParserState::Start,
            context: ParseContext::new(),
            event_source: None,
            summary: ImportSummary::new(),
        }
    }

    /// Parse the stream and persist decoded records inside one transaction.
    ///
    /// Always returns a summary when the stream is exhausted, no matter how
    /// many blocks failed; only a catalogue conflict (or stream I/O failure)
    /// aborts, and then with the transaction rolled back.
    pub fn import<R: BufRead>(self, reader: R, options: &ImportOptions) -> Result<ImportSummary> {
        self.import_with_progress(reader, options, |_| {})
    }

    /// Like [`Importer::import`], invoking `on_line` with each 1-based line
    /// number before the line is processed. Used for progress reporting.
    pub fn import_with_progress<R: BufRead>(
        mut self,
        reader: R,
        options: &ImportOptions,
        mut on_line: impl FnMut(usize),
    ) -> Result<ImportSummary> {
        self.catalogue.begin()?;

        for (index, line) in reader.lines().enumerate() {
            let line_num = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    self.catalogue.rollback()?;
                    return Err(err.into());
                }
            };
            on_line(line_num);

            // Fixed columns are anchored at column 0, so only trailing
            // whitespace (and the line terminator) is stripped.
            let line = line.trim_end();
            let kind = classify(line, self.is_start());

            match kind {
                LineKind::Comment => continue,
                LineKind::Stop => {
                    debug!(line_num, "stop line reached");
                    break;
                }
                _ => {}
            }

            match self.step(line, kind) {
                Ok(counts) => self.summary.absorb(counts),
                Err(Error::Catalogue(err)) => {
                    warn!(line_num, %err, "persistence conflict, rolling back");
                    self.catalogue.rollback()?;
                    return Err(Error::parsing_failure(line_num));
                }
                Err(err) if err.is_recoverable() => {
                    if self.is_start() && kind == LineKind::Junk && options.allow_junk {
                        debug!(line_num, "skipping junk line before catalogue header");
                        continue;
                    }
                    debug!(line_num, %err, "recovering from malformed block");
                    self.summary.record_error(
                        line_num,
                        format!(
                            "line {line_num} violates the ISF format ({err}), please check \
                             the related format documentation at: {ISF_FORMAT_URL}"
                        ),
                    );
                    self.state = ParserState::Start;
                }
                Err(err) => {
                    self.catalogue.rollback()?;
                    return Err(err);
                }
            }
        }

        self.catalogue.commit()?;
        info!(
            created = self.summary.total_created(),
            errors = self.summary.errors.len(),
            "import committed"
        );
        Ok(self.summary)
    }

    /// True before any catalogue header has established an event source.
    /// Gates both length-based line classification and junk tolerance.
    fn is_start(&self) -> bool {
        matches!(self.state, ParserState::Start) && self.event_source.is_none()
    }

    /// Transition into the state for `kind` and decode the line there
    fn step(&mut self, line: &str, kind: LineKind) -> Result<RecordCounts> {
        self.state = self.state.transition(kind, self.event_source)?;
        states::process_line(
            &mut self.state,
            line,
            self.catalogue,
            &mut self.context,
            &mut self.event_source,
        )
    }
}

/// Convenience entry point: import `reader` into `catalogue` and return the
/// summary
pub fn import_bulletin<R: BufRead, C: Catalogue + ?Sized>(
    reader: R,
    catalogue: &mut C,
    options: &ImportOptions,
) -> Result<ImportSummary> {
    Importer::new(catalogue).import(reader, options)
}
