//! In-memory catalogue store
//!
//! Entities live in id-indexed vectors with hash indexes over their natural
//! keys. Transactions are snapshot-based: `begin` checkpoints the committed
//! state and `rollback` restores it, so a failed import leaves no partial
//! records behind.

use std::collections::HashMap;

use tracing::debug;

use super::{Catalogue, CatalogueError, CatalogueResult};
use crate::app::models::{
    Agency, AgencyId, Event, EventId, EventSource, EventSourceId, MagnitudeMeasure, MeasureData,
    MeasureId, Origin, OriginData, OriginId,
};

#[derive(Debug, Clone, Default)]
struct Store {
    event_sources: Vec<EventSource>,
    agencies: Vec<Agency>,
    events: Vec<Event>,
    origins: Vec<Origin>,
    measures: Vec<MagnitudeMeasure>,

    event_source_index: HashMap<String, EventSourceId>,
    agency_index: HashMap<(String, EventSourceId), AgencyId>,
    event_index: HashMap<(String, EventSourceId), EventId>,
    origin_index: HashMap<(String, EventSourceId), OriginId>,
    measure_index: HashMap<(EventId, OriginId, AgencyId, String), MeasureId>,
}

/// In-memory [`Catalogue`] implementation
#[derive(Debug, Default)]
pub struct MemoryCatalogue {
    store: Store,
    checkpoint: Option<Store>,
}

impl MemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_sources(&self) -> &[EventSource] {
        &self.store.event_sources
    }

    pub fn agencies(&self) -> &[Agency] {
        &self.store.agencies
    }

    pub fn events(&self) -> &[Event] {
        &self.store.events
    }

    pub fn origins(&self) -> &[Origin] {
        &self.store.origins
    }

    pub fn measures(&self) -> &[MagnitudeMeasure] {
        &self.store.measures
    }

    /// Look up an origin by its source key, across all event sources
    pub fn origin_by_key(&self, source_key: &str) -> Option<&Origin> {
        self.store
            .origins
            .iter()
            .find(|origin| origin.source_key == source_key)
    }
}

impl Catalogue for MemoryCatalogue {
    fn begin(&mut self) -> CatalogueResult<()> {
        if self.checkpoint.is_some() {
            return Err(CatalogueError::storage("transaction already open"));
        }
        self.checkpoint = Some(self.store.clone());
        Ok(())
    }

    fn commit(&mut self) -> CatalogueResult<()> {
        if self.checkpoint.take().is_none() {
            return Err(CatalogueError::storage("no transaction to commit"));
        }
        debug!(
            event_sources = self.store.event_sources.len(),
            events = self.store.events.len(),
            origins = self.store.origins.len(),
            measures = self.store.measures.len(),
            "transaction committed"
        );
        Ok(())
    }

    fn rollback(&mut self) -> CatalogueResult<()> {
        match self.checkpoint.take() {
            Some(checkpoint) => {
                self.store = checkpoint;
                debug!("transaction rolled back");
                Ok(())
            }
            None => Err(CatalogueError::storage("no transaction to roll back")),
        }
    }

    fn find_or_create_event_source(
        &mut self,
        name: &str,
    ) -> CatalogueResult<(EventSourceId, bool)> {
        if let Some(&id) = self.store.event_source_index.get(name) {
            return Ok((id, false));
        }
        let id = EventSourceId(self.store.event_sources.len() as u64);
        self.store.event_sources.push(EventSource {
            id,
            name: name.to_owned(),
        });
        self.store.event_source_index.insert(name.to_owned(), id);
        Ok((id, true))
    }

    fn find_or_create_agency(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
    ) -> CatalogueResult<(AgencyId, bool)> {
        let key = (source_key.to_owned(), event_source);
        if let Some(&id) = self.store.agency_index.get(&key) {
            return Ok((id, false));
        }
        let id = AgencyId(self.store.agencies.len() as u64);
        self.store.agencies.push(Agency {
            id,
            source_key: source_key.to_owned(),
            event_source,
        });
        self.store.agency_index.insert(key, id);
        Ok((id, true))
    }

    fn find_or_create_event(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
    ) -> CatalogueResult<(EventId, bool)> {
        let key = (source_key.to_owned(), event_source);
        if let Some(&id) = self.store.event_index.get(&key) {
            return Ok((id, false));
        }
        let id = EventId(self.store.events.len() as u64);
        self.store.events.push(Event {
            id,
            source_key: source_key.to_owned(),
            event_source,
            name: String::new(),
        });
        self.store.event_index.insert(key, id);
        Ok((id, true))
    }

    fn rename_event(&mut self, event: EventId, name: &str) -> CatalogueResult<()> {
        let record = self
            .store
            .events
            .get_mut(event.0 as usize)
            .ok_or_else(|| CatalogueError::storage(format!("no event with id {event}")))?;
        if record.name != name {
            record.name = name.to_owned();
        }
        Ok(())
    }

    fn find_or_create_origin(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
        data: &OriginData,
    ) -> CatalogueResult<(OriginId, bool)> {
        let key = (source_key.to_owned(), event_source);
        if let Some(&id) = self.store.origin_index.get(&key) {
            return Ok((id, false));
        }
        let id = OriginId(self.store.origins.len() as u64);
        self.store.origins.push(Origin {
            id,
            source_key: source_key.to_owned(),
            event_source,
            time: data.time,
            time_error: data.time_error,
            time_rms: data.time_rms,
            position: data.position,
            semi_major_90_error: data.semi_major_90_error,
            semi_minor_90_error: data.semi_minor_90_error,
            azimuth_error: data.azimuth_error,
            depth: data.depth,
            depth_error: data.depth_error,
        });
        self.store.origin_index.insert(key, id);
        Ok((id, true))
    }

    fn find_or_create_measure(
        &mut self,
        event: EventId,
        origin: OriginId,
        agency: AgencyId,
        scale: &str,
        data: &MeasureData,
    ) -> CatalogueResult<(MeasureId, bool)> {
        let key = (event, origin, agency, scale.to_owned());
        if let Some(&id) = self.store.measure_index.get(&key) {
            return Ok((id, false));
        }
        let id = MeasureId(self.store.measures.len() as u64);
        self.store.measures.push(MagnitudeMeasure {
            id,
            event,
            origin,
            agency,
            scale: scale.to_owned(),
            value: data.value,
            standard_error: data.standard_error,
        });
        self.store.measure_index.insert(key, id);
        Ok((id, true))
    }
}
