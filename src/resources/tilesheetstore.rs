//! Tile sheet registry.
//!
//! Sprites built from properties name their tile sheet by id; the factories
//! look the id up here. The store holds one [`Arc`] per sheet, so a sheet
//! removed from the store stays alive while sprites still reference it.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::resources::tilesheet::{SharedTileSheet, TileSheet};

/// Registry of shared tile sheets by id.
#[derive(Resource, Debug, Default)]
pub struct TileSheetStore {
    pub map: FxHashMap<String, SharedTileSheet>,
}

impl TileSheetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        TileSheetStore {
            map: FxHashMap::default(),
        }
    }
    /// Get a new handle to a sheet by id.
    pub fn get(&self, id: impl AsRef<str>) -> Option<SharedTileSheet> {
        self.map.get(id.as_ref()).cloned()
    }
    /// Register a sheet under its own id, replacing any previous one.
    pub fn insert(&mut self, sheet: SharedTileSheet) {
        self.map.insert(sheet.id().to_string(), sheet);
    }
    /// Wrap and register a sheet, returning the shared handle.
    pub fn add(&mut self, sheet: TileSheet) -> SharedTileSheet {
        let sheet = Arc::new(sheet);
        self.insert(Arc::clone(&sheet));
        sheet
    }
    /// Drop the store's handle to a sheet.
    pub fn remove(&mut self, id: impl AsRef<str>) -> Option<SharedTileSheet> {
        self.map.remove(id.as_ref())
    }

    /// Clear all registered sheets.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_share_the_sheet() {
        let mut store = TileSheetStore::new();
        let sheet = store.add(TileSheet::new("tiles", "tiles.png"));
        let fetched = store.get("tiles").unwrap();
        assert!(Arc::ptr_eq(&sheet, &fetched));
        assert_eq!(TileSheet::ref_count(&sheet), 3);
    }

    #[test]
    fn test_clear_releases_store_handles() {
        let mut store = TileSheetStore::new();
        let tiles = store.add(TileSheet::new("tiles", "tiles.png"));
        store.add(TileSheet::new("hero", "hero.png"));
        assert_eq!(TileSheet::ref_count(&tiles), 2);
        store.clear();
        assert!(store.map.is_empty());
        assert!(store.get("hero").is_none());
        assert_eq!(TileSheet::ref_count(&tiles), 1);
    }

    #[test]
    fn test_remove_keeps_outside_handles_alive() {
        let mut store = TileSheetStore::new();
        let sheet = store.add(TileSheet::new("tiles", "tiles.png"));
        assert!(store.remove("tiles").is_some());
        assert!(store.get("tiles").is_none());
        assert_eq!(TileSheet::ref_count(&sheet), 1);
        assert_eq!(sheet.id(), "tiles");
    }
}
