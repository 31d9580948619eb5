//! Persistence interface for decoded catalogue records
//!
//! The parser never writes ad hoc: every record goes through a
//! [`Catalogue`], an explicitly passed handle offering find-or-create
//! operations keyed by natural keys and a single transaction spanning the
//! whole import. The crate ships [`MemoryCatalogue`] as the in-memory
//! implementation; database-backed stores implement the same trait.

pub mod memory;

pub use memory::MemoryCatalogue;

use crate::app::models::{
    AgencyId, EventId, EventSourceId, MeasureData, MeasureId, OriginData, OriginId, Point,
};

/// Errors reported by a catalogue implementation
#[derive(thiserror::Error, Debug)]
pub enum CatalogueError {
    /// A uniqueness or integrity constraint was violated. Fatal to an
    /// import: the in-flight partial writes may be structurally
    /// inconsistent, so the importer rolls back and aborts.
    #[error("integrity conflict: {message}")]
    Conflict { message: String },

    /// Any other storage failure
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl CatalogueError {
    /// Create an integrity-conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a generic storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Result alias for catalogue operations
pub type CatalogueResult<T> = std::result::Result<T, CatalogueError>;

/// Find-or-create persistence for catalogue records.
///
/// Every `find_or_create_*` method is idempotent: it returns the existing
/// record matching the natural key, or creates one from the supplied
/// creation data. The boolean in the returned pair is true when the record
/// was newly created. All writes issued between [`Catalogue::begin`] and
/// [`Catalogue::commit`] form one logical transaction.
pub trait Catalogue {
    /// Open the transaction for an import run
    fn begin(&mut self) -> CatalogueResult<()>;

    /// Make all writes since [`Catalogue::begin`] durable
    fn commit(&mut self) -> CatalogueResult<()>;

    /// Discard all writes since [`Catalogue::begin`]
    fn rollback(&mut self) -> CatalogueResult<()>;

    /// Construct the position value persisted with an origin. The default
    /// builds a range-validated [`Point`]; stores with richer geometry types
    /// can override it.
    fn make_point(&self, latitude: f64, longitude: f64) -> crate::Result<Point> {
        Point::new(latitude, longitude)
    }

    /// Natural key: `name`
    fn find_or_create_event_source(&mut self, name: &str)
    -> CatalogueResult<(EventSourceId, bool)>;

    /// Natural key: (`source_key`, `event_source`)
    fn find_or_create_agency(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
    ) -> CatalogueResult<(AgencyId, bool)>;

    /// Natural key: (`source_key`, `event_source`)
    fn find_or_create_event(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
    ) -> CatalogueResult<(EventId, bool)>;

    /// Update an event's descriptive name when the stored one differs
    fn rename_event(&mut self, event: EventId, name: &str) -> CatalogueResult<()>;

    /// Natural key: (`source_key`, `event_source`); `data` used on creation
    fn find_or_create_origin(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
        data: &OriginData,
    ) -> CatalogueResult<(OriginId, bool)>;

    /// Natural key: (`event`, `origin`, `agency`, `scale`); `data` used on
    /// creation
    fn find_or_create_measure(
        &mut self,
        event: EventId,
        origin: OriginId,
        agency: AgencyId,
        scale: &str,
        data: &MeasureData,
    ) -> CatalogueResult<(MeasureId, bool)>;
}
