//! Per-import lookup context shared between parser states
//!
//! Origin blocks register the agencies and origins they create so that the
//! measure blocks of the same event can resolve them by source key without
//! going back to the catalogue.

use crate::app::models::{AgencyId, OriginId};
use std::collections::HashMap;

/// Mutable maps scoped to a single import run. Created empty on entry to the
/// importer and threaded by reference through the states; never shared
/// across runs.
#[derive(Debug, Default)]
pub struct ParseContext {
    agencies: HashMap<String, AgencyId>,
    origins: HashMap<String, OriginId>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries; called when a new import run starts
    pub fn clear(&mut self) {
        self.agencies.clear();
        self.origins.clear();
    }

    pub fn agency(&self, source_key: &str) -> Option<AgencyId> {
        self.agencies.get(source_key).copied()
    }

    pub fn insert_agency(&mut self, source_key: impl Into<String>, id: AgencyId) {
        self.agencies.insert(source_key.into(), id);
    }

    pub fn origin(&self, source_key: &str) -> Option<OriginId> {
        self.origins.get(source_key).copied()
    }

    pub fn insert_origin(&mut self, source_key: impl Into<String>, id: OriginId) {
        self.origins.insert(source_key.into(), id);
    }
}
