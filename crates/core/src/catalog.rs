use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::{
    hotel::{CatalogEntry, HotelRecord},
    search::{FilterCriteria, FilteredHotel},
};
use crate::filter::filter_hotels;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read hotel catalog `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse hotel catalog `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("hotel catalog entry #{index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

/// Read-only hotel catalog, loaded once and shared by every request.
/// Cloning copies a pointer, never the records.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    hotels: Arc<[HotelRecord]>,
}

impl Catalog {
    pub fn new(hotels: Vec<HotelRecord>) -> Self {
        Self { hotels: hotels.into() }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        let entries = serde_json::from_str::<Vec<CatalogEntry>>(&raw)
            .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })?;

        let catalog = Self::from_entries(entries)?;
        info!(
            event_name = "hotel.catalog.loaded",
            path = %path.display(),
            hotels = catalog.len(),
            "hotel catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let entries = serde_json::from_str::<Vec<CatalogEntry>>(raw).map_err(|source| {
            CatalogError::ParseFile { path: PathBuf::from("<inline>"), source }
        })?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let hotels = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                entry.into_record().map_err(|reason| CatalogError::InvalidEntry { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(hotels))
    }

    pub fn hotels(&self) -> &[HotelRecord] {
        &self.hotels
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    pub fn search(&self, criteria: &FilterCriteria) -> Vec<FilteredHotel> {
        filter_hotels(criteria, &self.hotels)
    }
}
