//! Page controller: which figure is shown for each indicator, and the zoom overlay.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::chart::{Figure, FigureSize};
use crate::constants::ZOOM_SIZE;
use crate::error::{Result, SeriesError};
use crate::types::{Country, IndexKind, TimeSeriesKey};

/// Owns the rendered figures and the current country selection per indicator.
pub struct Dashboard {
    figures: HashMap<TimeSeriesKey, Figure>,
    selection: BTreeMap<IndexKind, Country>,
    zoom_size: FigureSize,
}

/// Serializable view of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub selection: BTreeMap<IndexKind, Country>,
    pub figures: Vec<Figure>,
}

impl Dashboard {
    /// Every indicator starts on Argentina
    pub fn new(figures: HashMap<TimeSeriesKey, Figure>) -> Self {
        let selection = IndexKind::ALL
            .iter()
            .map(|kind| (*kind, Country::Argentina))
            .collect();
        Self {
            figures,
            selection,
            zoom_size: FigureSize::new(ZOOM_SIZE.0, ZOOM_SIZE.1),
        }
    }

    pub fn with_zoom_size(mut self, size: FigureSize) -> Self {
        self.zoom_size = size;
        self
    }

    pub fn figure(&self, key: &TimeSeriesKey) -> Option<&Figure> {
        self.figures.get(key)
    }

    /// Keys with a figure, sorted
    pub fn keys(&self) -> Vec<TimeSeriesKey> {
        let mut keys: Vec<_> = self.figures.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn selected_country(&self, index_kind: IndexKind) -> Country {
        self.selection
            .get(&index_kind)
            .copied()
            .unwrap_or(Country::Argentina)
    }

    /// Switch the figure shown for an indicator. The selection is left alone
    /// when the requested series has no figure.
    pub fn select_country(&mut self, index_kind: IndexKind, country: Country) -> Result<&Figure> {
        let key = TimeSeriesKey::new(index_kind, country);
        if !self.figures.contains_key(&key) {
            return Err(SeriesError::Unavailable { key });
        }
        self.selection.insert(index_kind, country);
        debug!("Selected {} for {}", country, index_kind);
        self.figures.get(&key).ok_or(SeriesError::Unavailable { key })
    }

    /// The figure currently shown for an indicator
    pub fn displayed(&self, index_kind: IndexKind) -> Result<&Figure> {
        let key = TimeSeriesKey::new(index_kind, self.selected_country(index_kind));
        self.figures.get(&key).ok_or(SeriesError::Unavailable { key })
    }

    /// The displayed figure re-rendered at overlay size; the stored one keeps its size
    pub fn zoom(&self, index_kind: IndexKind) -> Result<Figure> {
        Ok(self.displayed(index_kind)?.resized(self.zoom_size))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let figures = self
            .keys()
            .iter()
            .filter_map(|key| self.figures.get(key).cloned())
            .collect();
        DashboardSnapshot {
            selection: self.selection.clone(),
            figures,
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, body)?;
        info!("Wrote dashboard with {} figures to {}", self.figures.len(), path.display());
        Ok(())
    }
}
