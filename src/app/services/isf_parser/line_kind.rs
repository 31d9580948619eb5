//! Line classification for ISF bulletin streams
//!
//! An ISF bulletin has no delimiters: every line is recognized by exact
//! string match, by a header-pattern regular expression, or by its exact
//! length. Length-based detection is only meaningful once a catalogue header
//! has established context, so classification takes the parser's "is start"
//! flag as input.

use crate::constants::{CATALOGUE_HEADER, MEASURE_BLOCK_LEN, ORIGIN_BLOCK_LEN, STOP_LINE};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Closed set of line kinds an ISF bulletin can contain.
/// Exactly one kind per line; [`classify`] is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    CatalogueHeader,
    EventHeader,
    OriginHeader,
    OriginBlock,
    MeasureHeader,
    MeasureBlock,
    MeasureUnknownScaleBlock,
    Comment,
    Stop,
    Junk,
}

impl LineKind {
    /// Stable lower-case name, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::CatalogueHeader => "catalogue_header",
            Self::EventHeader => "event_header",
            Self::OriginHeader => "origin_header",
            Self::OriginBlock => "origin_block",
            Self::MeasureHeader => "measure_header",
            Self::MeasureBlock => "measure_block",
            Self::MeasureUnknownScaleBlock => "measure_unknown_scale_block",
            Self::Comment => "comment",
            Self::Stop => "stop",
            Self::Junk => "junk",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column-title row opening an origin block
static ORIGIN_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Date\s+Time\s+Err\s+RMS\s+Latitude\s+Longitude\s+Smaj\s+Smin\s+Az\s+Depth\s+Err\s+Ndef\s+Nst[a]*\s+Gap\s+mdist\s+Mdist\s+Qual\s+Author\s+OrigID$",
    )
    .unwrap()
});

/// Column-title row opening a magnitude measure block
static MEASURE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Magnitude\s+Err\s+Nsta\s+Author\s+OrigID$").unwrap());

/// `Event <source_key> <name>` header
static EVENT_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Event\s+(?P<source_event_id>\w{0,9}) (?P<name>.{0,65})$").unwrap()
});

/// A parenthesized comment: opens with `(` not followed by `)`
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\([^)].+\)").unwrap());

/// Whitespace-separated measure whose scale the bulletin does not name:
/// `value [error] [stations] agency origin`
static UNKNOWN_SCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<val>-*[0-9]+\.[0-9]+)\s+(?P<error>[0-9]+\.[0-9]+)*\s+(?P<stations>[0-9]+)*\s+(?P<agency>[\w;]+)\s+(?P<origin>\w+)$",
    )
    .unwrap()
});

/// Classify a trailing-trimmed bulletin line. Deterministic and total; the
/// rules are tried in priority order so the fixed-length checks only fire
/// when nothing better matched.
///
/// `current_state_is_start` gates the length-based rules: before a catalogue
/// header has established context, a line of exactly 136 or 38 characters is
/// just as likely to be boilerplate, so it falls through to junk.
pub fn classify(line: &str, current_state_is_start: bool) -> LineKind {
    if line == CATALOGUE_HEADER {
        LineKind::CatalogueHeader
    } else if line == STOP_LINE {
        LineKind::Stop
    } else if COMMENT_RE.is_match(line) || line.trim().is_empty() {
        LineKind::Comment
    } else if ORIGIN_HEADER_RE.is_match(line) {
        LineKind::OriginHeader
    } else if MEASURE_HEADER_RE.is_match(line) {
        LineKind::MeasureHeader
    } else if EVENT_HEADER_RE.is_match(line) {
        LineKind::EventHeader
    } else if line.len() == ORIGIN_BLOCK_LEN && !current_state_is_start {
        LineKind::OriginBlock
    } else if line.len() == MEASURE_BLOCK_LEN && !current_state_is_start {
        LineKind::MeasureBlock
    } else if UNKNOWN_SCALE_RE.is_match(line) {
        LineKind::MeasureUnknownScaleBlock
    } else {
        LineKind::Junk
    }
}

/// Decoded `Event` header fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHeader<'a> {
    pub source_key: &'a str,
    pub name: &'a str,
}

/// Extract the source key and descriptive name from an event header line
pub fn event_header_fields(line: &str) -> Option<EventHeader<'_>> {
    let caps = EVENT_HEADER_RE.captures(line)?;
    Some(EventHeader {
        source_key: caps.name("source_event_id")?.as_str(),
        name: caps.name("name")?.as_str(),
    })
}

/// Raw groups of an unknown-scale measure line. Error and station groups are
/// optional in the pattern and absent when the bulletin omits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScaleMeasure<'a> {
    pub value: &'a str,
    pub error: Option<&'a str>,
    pub stations: Option<&'a str>,
    pub agency: &'a str,
    pub origin: &'a str,
}

/// Extract the whitespace-separated groups of an unknown-scale measure line
pub fn unknown_scale_fields(line: &str) -> Option<UnknownScaleMeasure<'_>> {
    let caps = UNKNOWN_SCALE_RE.captures(line)?;
    Some(UnknownScaleMeasure {
        value: caps.name("val")?.as_str(),
        error: caps.name("error").map(|m| m.as_str()),
        stations: caps.name("stations").map(|m| m.as_str()),
        agency: caps.name("agency")?.as_str(),
        origin: caps.name("origin")?.as_str(),
    })
}
