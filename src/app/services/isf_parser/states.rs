//! Parser states, the transition table, and per-state line decoding
//!
//! The parser is a finite-state machine: each line's [`LineKind`] acts as
//! the event, and the closed [`ParserState`] enum owns whatever context the
//! lines it expects need (the current event, the metadata accumulated by the
//! last origin block). A state can only be constructed holding references to
//! entities already established by an ancestor state.

use tracing::debug;

use super::context::ParseContext;
use super::fields;
use super::line_kind::{self, LineKind};
use super::summary::RecordCounts;
use crate::app::models::{
    AnalysisType, EventId, EventSourceId, LocationMethod, MeasureData, OriginData, OriginMetadata,
};
use crate::app::services::catalogue::Catalogue;
use crate::constants::{UNKNOWN_SCALE, event_type_description};
use crate::{Error, Result};

/// The entities the current event block was established under. Copied into
/// every state that decodes lines belonging to that event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    pub event: EventId,
    pub event_source: EventSourceId,
}

/// Closed set of parser states. Only `Start` may begin an import, and
/// `Start` is also the recovery target after a malformed block.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserState {
    /// Before (or between) event blocks. The established event source lives
    /// in the importer so that it survives block-level recovery.
    Start,
    /// An event header was seen; the event itself is established by decoding
    /// the header line.
    Event {
        event_source: EventSourceId,
        event: Option<EventContext>,
    },
    /// The column-title row of an origin block; decodes nothing
    OriginHeader { event: EventContext },
    /// Inside an origin block; decoding fills `metadata`
    OriginBlock {
        event: EventContext,
        metadata: Option<OriginMetadata>,
    },
    /// The column-title row of a measure block; decodes nothing
    MeasureHeader {
        event: EventContext,
        metadata: Option<OriginMetadata>,
    },
    /// Inside a measure block, fixed-width layout
    MeasureBlock {
        event: EventContext,
        metadata: Option<OriginMetadata>,
    },
    /// Inside a measure block, whitespace-separated unknown-scale layout
    MeasureUnknownScaleBlock {
        event: EventContext,
        metadata: Option<OriginMetadata>,
    },
}

impl ParserState {
    /// Stable state name, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Event { .. } => "Event",
            Self::OriginHeader { .. } => "OriginHeader",
            Self::OriginBlock { .. } => "OriginBlock",
            Self::MeasureHeader { .. } => "MeasureHeader",
            Self::MeasureBlock { .. } => "MeasureBlock",
            Self::MeasureUnknownScaleBlock { .. } => "MeasureUnknownScaleBlock",
        }
    }

    /// Compute the state that follows this one for the classified line kind.
    ///
    /// `established` is the event source set up by a catalogue header, if
    /// any; `Start` only accepts an event header once one exists. Any
    /// (state, kind) pair not in the table is an invalid transition.
    pub fn transition(
        &self,
        kind: LineKind,
        established: Option<EventSourceId>,
    ) -> Result<ParserState> {
        let next = match (self, kind) {
            (Self::Start, LineKind::CatalogueHeader) => Some(Self::Start),
            (Self::Start, LineKind::EventHeader) => {
                established.map(|event_source| Self::Event {
                    event_source,
                    event: None,
                })
            }

            (Self::Event { event, .. }, LineKind::OriginHeader) => {
                (*event).map(|event| Self::OriginHeader { event })
            }

            (Self::OriginHeader { event }, LineKind::OriginBlock) => Some(Self::OriginBlock {
                event: *event,
                metadata: None,
            }),

            (Self::OriginBlock { event, metadata }, LineKind::MeasureHeader) => {
                Some(Self::MeasureHeader {
                    event: *event,
                    metadata: metadata.clone(),
                })
            }
            (Self::OriginBlock { event, .. }, LineKind::OriginBlock) => Some(Self::OriginBlock {
                event: *event,
                metadata: None,
            }),
            (Self::OriginBlock { event, .. }, LineKind::EventHeader) => Some(Self::Event {
                event_source: event.event_source,
                event: None,
            }),

            (
                Self::MeasureHeader { event, metadata }
                | Self::MeasureBlock { event, metadata }
                | Self::MeasureUnknownScaleBlock { event, metadata },
                LineKind::MeasureBlock,
            ) => Some(Self::MeasureBlock {
                event: *event,
                metadata: metadata.clone(),
            }),
            (
                Self::MeasureHeader { event, metadata }
                | Self::MeasureBlock { event, metadata }
                | Self::MeasureUnknownScaleBlock { event, metadata },
                LineKind::MeasureUnknownScaleBlock,
            ) => Some(Self::MeasureUnknownScaleBlock {
                event: *event,
                metadata: metadata.clone(),
            }),
            (
                Self::MeasureBlock { event, .. } | Self::MeasureUnknownScaleBlock { event, .. },
                LineKind::EventHeader,
            ) => Some(Self::Event {
                event_source: event.event_source,
                event: None,
            }),

            _ => None,
        };

        next.ok_or_else(|| Error::invalid_transition(self.name(), kind.name()))
    }
}

/// Decode `line` in the freshly-entered `state`, persisting records through
/// the catalogue and returning the newly-created counts for the summary.
///
/// `established` is written when a catalogue header sets up the event
/// source. Header-row states decode nothing.
pub fn process_line<C: Catalogue + ?Sized>(
    state: &mut ParserState,
    line: &str,
    catalogue: &mut C,
    context: &mut ParseContext,
    established: &mut Option<EventSourceId>,
) -> Result<RecordCounts> {
    let mut counts = RecordCounts::default();

    match state {
        ParserState::Start => {
            let (id, created) = catalogue.find_or_create_event_source(line)?;
            debug!(name = line, %id, created, "event source established");
            *established = Some(id);
            counts.event_sources += usize::from(created);
        }

        ParserState::Event {
            event_source,
            event,
        } => {
            let header = line_kind::event_header_fields(line).ok_or_else(|| {
                Error::field_decoding(format!("malformed event header: '{line}'"))
            })?;
            let (id, created) = catalogue.find_or_create_event(header.source_key, *event_source)?;
            catalogue.rename_event(id, header.name)?;
            *event = Some(EventContext {
                event: id,
                event_source: *event_source,
            });
            counts.events += usize::from(created);
        }

        // Pure transition holders
        ParserState::OriginHeader { .. } | ParserState::MeasureHeader { .. } => {}

        ParserState::OriginBlock { event, metadata } => {
            let event = *event;

            let author = fields::required_str(line, 118..127, "origin author")?;
            let (agency, agency_created) =
                catalogue.find_or_create_agency(author, event.event_source)?;
            context.insert_agency(author, agency);
            counts.agencies += usize::from(agency_created);

            let data = decode_origin_data(line, catalogue)?;
            let origin_key = fields::required_str(line, 128..136, "origin id")?;
            let (origin, origin_created) =
                catalogue.find_or_create_origin(origin_key, event.event_source, &data)?;
            context.insert_origin(origin_key, origin);
            counts.origins += usize::from(origin_created);

            *metadata = Some(decode_origin_metadata(line)?);
        }

        ParserState::MeasureBlock { event, metadata } => {
            let scale = fields::optional_str(line, 0..5).unwrap_or_default().to_owned();

            // Min/max magnitude indicators are not supported; reject rather
            // than silently import a bounded value as an exact one.
            if let Some(indicator) = fields::code_at(line, 5) {
                return Err(Error::field_decoding(format!(
                    "unsupported min/max magnitude indicator '{indicator}'"
                )));
            }

            let value = fields::required_f64(line, 6..11, "magnitude value")?;
            let standard_error = fields::optional_f64(line, 11..14, "magnitude standard error")?;
            let stations = fields::optional_i32(line, 15..19, "measure station count")?;
            let agency_name = fields::required_str(line, 19..29, "measure author")?;
            let origin_key = fields::required_str(line, 30..38, "measure origin id")?;

            let created = save_measure(
                catalogue,
                context,
                *event,
                agency_name,
                origin_key,
                &scale,
                value,
                standard_error,
            )?;
            metadata.get_or_insert_with(Default::default).stations = stations;
            counts.measures += usize::from(created);
        }

        ParserState::MeasureUnknownScaleBlock { event, metadata } => {
            let groups = line_kind::unknown_scale_fields(line).ok_or_else(|| {
                Error::field_decoding(format!("malformed unknown-scale measure: '{line}'"))
            })?;
            let value = groups.value.parse::<f64>().map_err(|_| {
                Error::field_decoding(format!("invalid magnitude value: '{}'", groups.value))
            })?;
            let standard_error = groups
                .error
                .map(|raw| {
                    raw.parse::<f64>().map_err(|_| {
                        Error::field_decoding(format!("invalid magnitude standard error: '{raw}'"))
                    })
                })
                .transpose()?;
            let stations = groups
                .stations
                .map(|raw| {
                    raw.parse::<i32>().map_err(|_| {
                        Error::field_decoding(format!("invalid measure station count: '{raw}'"))
                    })
                })
                .transpose()?;

            let created = save_measure(
                catalogue,
                context,
                *event,
                groups.agency,
                groups.origin,
                UNKNOWN_SCALE,
                value,
                standard_error,
            )?;
            metadata.get_or_insert_with(Default::default).stations = stations;
            counts.measures += usize::from(created);
        }
    }

    Ok(counts)
}

/// Decode the origin creation fields from the fixed columns of an origin
/// block line. Error quantities flagged fixed (`f`) read as absent no matter
/// what the adjacent digits say.
fn decode_origin_data<C: Catalogue + ?Sized>(line: &str, catalogue: &C) -> Result<OriginData> {
    let time = fields::origin_time(line)?;

    let time_error = if fields::fixed_flag_at(line, 22) {
        None
    } else {
        fields::optional_f64(line, 24..29, "origin time error")?
    };
    let time_rms = fields::optional_f64(line, 30..35, "origin time rms")?;

    let latitude = fields::required_f64(line, 36..44, "origin latitude")?;
    let longitude = fields::required_f64(line, 45..54, "origin longitude")?;
    let position = catalogue.make_point(latitude, longitude)?;

    let fixed_position = fields::fixed_flag_at(line, 54);
    let semi_major_90_error = if fixed_position {
        None
    } else {
        fields::optional_f64(line, 55..60, "origin semi-major error")?
    };
    let semi_minor_90_error = if fixed_position {
        None
    } else {
        fields::optional_f64(line, 61..66, "origin semi-minor error")?
    };
    let azimuth_error = fields::optional_i32(line, 93..96, "origin azimuth error")?;

    let depth = fields::optional_f64(line, 71..76, "origin depth")?;
    let depth_error = if fields::fixed_flag_at(line, 76) {
        None
    } else {
        fields::optional_f64(line, 78..82, "origin depth error")?
    };

    Ok(OriginData {
        time,
        time_error,
        time_rms,
        position,
        semi_major_90_error,
        semi_minor_90_error,
        azimuth_error,
        depth,
        depth_error,
    })
}

/// Decode the origin block columns that describe how the solution was made.
/// Carried into the measure states and attached to nothing persistent.
fn decode_origin_metadata(line: &str) -> Result<OriginMetadata> {
    let analysis_type = fields::code_at(line, 111)
        .map(AnalysisType::from_code)
        .transpose()?;
    let location_method = fields::code_at(line, 113)
        .map(LocationMethod::from_code)
        .transpose()?;
    let event_type =
        fields::optional_str(line, 115..117).map(|code| event_type_description(code).to_owned());

    Ok(OriginMetadata {
        strike: fields::optional_i32(line, 67..70, "origin strike")?,
        phases: fields::optional_i32(line, 83..87, "origin phase count")?,
        stations: fields::optional_i32(line, 88..92, "origin station count")?,
        min_distance: fields::optional_f64(line, 97..103, "min station distance")?,
        max_distance: fields::optional_f64(line, 104..110, "max station distance")?,
        analysis_type,
        location_method,
        event_type,
    })
}

/// Persist a magnitude measure, resolving the agency through the per-event
/// context (falling back to the catalogue) and the origin strictly through
/// the context populated by this event's origin blocks.
#[allow(clippy::too_many_arguments)]
fn save_measure<C: Catalogue + ?Sized>(
    catalogue: &mut C,
    context: &mut ParseContext,
    event: EventContext,
    agency_name: &str,
    origin_key: &str,
    scale: &str,
    value: f64,
    standard_error: Option<f64>,
) -> Result<bool> {
    let agency = match context.agency(agency_name) {
        Some(agency) => agency,
        None => {
            let (agency, _) = catalogue.find_or_create_agency(agency_name, event.event_source)?;
            context.insert_agency(agency_name, agency);
            agency
        }
    };
    let origin = context
        .origin(origin_key)
        .ok_or_else(|| Error::unknown_origin(origin_key))?;

    let data = MeasureData {
        value,
        standard_error,
    };
    let (_, created) =
        catalogue.find_or_create_measure(event.event, origin, agency, scale, &data)?;
    debug!(scale, value, origin_key, created, "measure decoded");
    Ok(created)
}
