//! Domain models for imported catalogue data
//!
//! This module contains the records an ISF bulletin decodes into: the event
//! source a batch was imported from, the seismic events themselves, the
//! hypocentre solutions (origins), the recording agencies, and per-agency
//! magnitude measures.

use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Internal identifier of an [`EventSource`]
    EventSourceId
);
id_newtype!(
    /// Internal identifier of an [`Agency`]
    AgencyId
);
id_newtype!(
    /// Internal identifier of an [`Event`]
    EventId
);
id_newtype!(
    /// Internal identifier of an [`Origin`]
    OriginId
);
id_newtype!(
    /// Internal identifier of a [`MagnitudeMeasure`]
    MeasureId
);

// =============================================================================
// Geographic position
// =============================================================================

/// Epicentre coordinate in WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// Create a point, validating coordinate ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::field_decoding(format!(
                "invalid latitude {latitude}: must be between -90 and 90 degrees"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::field_decoding(format!(
                "invalid longitude {longitude}: must be between -180 and 180 degrees"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

// =============================================================================
// Catalogue entities
// =============================================================================

/// A source catalogue of seismic events, e.g. the ISC Web Catalogue.
///
/// Natural key: `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSource {
    pub id: EventSourceId,
    pub name: String,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventSource {}", self.name)
    }
}

/// The agency which authored an origin or recorded a measure.
///
/// Natural key: (`source_key`, `event_source`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    /// Identifier used by the event source for this agency
    pub source_key: String,
    pub event_source: EventSourceId,
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agency {}", self.source_key)
    }
}

/// A seismic event.
///
/// Natural key: (`source_key`, `event_source`). The name is descriptive and
/// updated in place when a re-import carries a different one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Identifier used by the event source for this event
    pub source_key: String,
    pub event_source: EventSourceId,
    pub name: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event {} from source {}", self.source_key, self.event_source)
    }
}

/// A hypocentre solution: a point at a given depth and time, with the
/// accuracy of each quantity where the bulletin reports one.
///
/// Natural key: (`source_key`, `event_source`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub id: OriginId,
    /// Identifier used by the event source for this origin
    pub source_key: String,
    pub event_source: EventSourceId,
    /// Origin time, UTC by ISF convention
    pub time: NaiveDateTime,
    /// Time error in seconds; absent when the time was flagged fixed
    pub time_error: Option<f64>,
    /// Time error as a root mean square in seconds
    pub time_rms: Option<f64>,
    pub position: Point,
    /// Semi-major axis of the 90th percentile confidence ellipsis of the
    /// epicentre, in km; absent when the position was flagged fixed
    pub semi_major_90_error: Option<f64>,
    /// Semi-minor axis of the same confidence ellipsis, in km
    pub semi_minor_90_error: Option<f64>,
    /// Azimuth of the semi-major axis with respect to geographic north
    pub azimuth_error: Option<i32>,
    /// Hypocentre depth in km
    pub depth: Option<f64>,
    /// Depth error in km; absent when the depth was flagged fixed
    pub depth_error: Option<f64>,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Origin {} {}", self.id, self.source_key)
    }
}

/// A single agency's estimate of an event's magnitude on a named scale.
///
/// Natural key: (`event`, `origin`, `agency`, `scale`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeMeasure {
    pub id: MeasureId,
    pub event: EventId,
    pub origin: OriginId,
    pub agency: AgencyId,
    /// Magnitude scale code (e.g. `mb`, `MS`, `ML`), or the unknown-scale
    /// sentinel [`crate::constants::UNKNOWN_SCALE`]
    pub scale: String,
    /// Magnitude in the unit suitable for the scale
    pub value: f64,
    /// Standard error of the magnitude value
    pub standard_error: Option<f64>,
}

impl fmt::Display for MagnitudeMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "measure {} {} by agency {} (sigma={:?})",
            self.value, self.scale, self.agency, self.standard_error
        )
    }
}

// =============================================================================
// Creation data
// =============================================================================

/// Creation fields for an [`Origin`], decoded from a fixed-width origin
/// block line. The natural key travels separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginData {
    pub time: NaiveDateTime,
    pub time_error: Option<f64>,
    pub time_rms: Option<f64>,
    pub position: Point,
    pub semi_major_90_error: Option<f64>,
    pub semi_minor_90_error: Option<f64>,
    pub azimuth_error: Option<i32>,
    pub depth: Option<f64>,
    pub depth_error: Option<f64>,
}

/// Creation fields for a [`MagnitudeMeasure`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureData {
    pub value: f64,
    pub standard_error: Option<f64>,
}

// =============================================================================
// Origin block metadata
// =============================================================================

/// How an origin solution was analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisType {
    Automatic,
    Manual,
    Guess,
}

impl AnalysisType {
    /// Decode the single-character ISF analysis-type code
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'a' => Ok(Self::Automatic),
            'm' => Ok(Self::Manual),
            'g' => Ok(Self::Guess),
            other => Err(Error::field_decoding(format!(
                "unknown analysis type code '{other}'"
            ))),
        }
    }
}

/// How an origin solution was located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationMethod {
    Inversion,
    PatternRecognition,
    GroundTruth,
    Other,
}

impl LocationMethod {
    /// Decode the single-character ISF location-method code
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'i' => Ok(Self::Inversion),
            'p' => Ok(Self::PatternRecognition),
            'g' => Ok(Self::GroundTruth),
            'o' => Ok(Self::Other),
            other => Err(Error::field_decoding(format!(
                "unknown location method code '{other}'"
            ))),
        }
    }
}

/// Metadata accumulated while decoding an origin block and carried into the
/// measure states of the same event block. A measure line's station count
/// replaces [`OriginMetadata::stations`] until the next origin block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginMetadata {
    pub strike: Option<i32>,
    /// Number of defining phases
    pub phases: Option<i32>,
    /// Number of defining stations
    pub stations: Option<i32>,
    /// Distance to the closest station, in degrees
    pub min_distance: Option<f64>,
    /// Distance to the furthest station, in degrees
    pub max_distance: Option<f64>,
    pub analysis_type: Option<AnalysisType>,
    pub location_method: Option<LocationMethod>,
    /// Event-type description resolved through the fixed code table
    pub event_type: Option<String>,
}
