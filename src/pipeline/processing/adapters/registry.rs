use std::collections::HashMap;

use super::{ArgentinaAdapter, NorwayCpiCsvAdapter, NorwaySdmxAdapter, SchemaAdapter};
use crate::error::{Result, SeriesError};
use crate::types::{Country, IndexKind, ObservationPoint, RawPayload, TimeSeriesKey};

/// Registry of schema adapters, selected by series key
pub struct AdapterRegistry {
    adapters: HashMap<TimeSeriesKey, Box<dyn SchemaAdapter>>,
}

impl AdapterRegistry {
    /// Create a registry with the built-in adapters
    pub fn new() -> Self {
        let mut registry = Self {
            adapters: HashMap::new(),
        };

        registry.register(TimeSeriesKey::new(IndexKind::Currency, Country::Argentina), Box::new(ArgentinaAdapter));
        registry.register(TimeSeriesKey::new(IndexKind::Cpi, Country::Argentina), Box::new(ArgentinaAdapter));
        registry.register(TimeSeriesKey::new(IndexKind::Currency, Country::Norway), Box::new(NorwaySdmxAdapter));
        registry.register(TimeSeriesKey::new(IndexKind::Cpi, Country::Norway), Box::new(NorwayCpiCsvAdapter));

        registry
    }

    /// Register (or replace) the adapter for a series
    pub fn register(&mut self, key: TimeSeriesKey, adapter: Box<dyn SchemaAdapter>) {
        self.adapters.insert(key, adapter);
    }

    pub fn get_adapter(&self, key: &TimeSeriesKey) -> Option<&dyn SchemaAdapter> {
        self.adapters.get(key).map(|a| a.as_ref())
    }

    /// Adapt a payload with the adapter registered for its series
    pub fn adapt(&self, key: &TimeSeriesKey, raw: &RawPayload) -> Result<Vec<ObservationPoint>> {
        match self.get_adapter(key) {
            Some(adapter) => adapter.adapt(key, raw),
            None => Err(SeriesError::Config(format!("No adapter registered for series: {}", key))),
        }
    }

    /// Registered keys, sorted
    pub fn list_keys(&self) -> Vec<TimeSeriesKey> {
        let mut keys: Vec<_> = self.adapters.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
