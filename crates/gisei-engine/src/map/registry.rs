use std::collections::HashMap;
use std::sync::Arc;

use crate::map::tiled::TiledMap;
use crate::map::{MapData, MapError, MapSource};

/// In-memory map store keyed by identifier. Maps are parsed once on insert
/// and handed out as shared handles.
#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: HashMap<String, Arc<MapData>>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built map under its own id. Replaces any map
    /// with the same id.
    pub fn insert(&mut self, map: MapData) {
        self.maps.insert(map.id.clone(), Arc::new(map));
    }

    /// Parse a Tiled JSON export and register it under `id`.
    pub fn insert_json(&mut self, id: &str, json: &str) -> Result<(), MapError> {
        let tiled = TiledMap::from_json(json).map_err(|source| MapError::Parse {
            id: id.to_string(),
            source,
        })?;
        let map = tiled.into_map_data(id);
        log::info!(
            "registered map `{}` ({}x{} px, {} colliders, {} enemies, {} consumables)",
            id,
            map.pixel_width(),
            map.pixel_height(),
            map.collisions.len(),
            map.enemies.len(),
            map.consumables.len()
        );
        self.insert(map);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.maps.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MapSource for MapRegistry {
    fn load_map(&self, id: &str) -> Result<Arc<MapData>, MapError> {
        self.maps
            .get(id)
            .cloned()
            .ok_or_else(|| MapError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_registered_map() {
        let mut reg = MapRegistry::new();
        reg.insert(MapData::new("level1_1", 10, 10, 32, 32));
        let map = reg.load_map("level1_1").unwrap();
        assert_eq!(map.id, "level1_1");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let reg = MapRegistry::new();
        match reg.load_map("nope") {
            Err(MapError::NotFound(id)) => assert_eq!(id, "nope"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn bad_json_reports_the_map_id() {
        let mut reg = MapRegistry::new();
        let err = reg.insert_json("broken", "{ nope").unwrap_err();
        assert!(matches!(err, MapError::Parse { ref id, .. } if id == "broken"));
        assert!(err.to_string().contains("broken"));
        assert!(!reg.contains("broken"));
    }

    #[test]
    fn insert_json_registers_under_given_id() {
        let mut reg = MapRegistry::new();
        reg.insert_json(
            "level2_1",
            r#"{ "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16, "layers": [] }"#,
        )
        .unwrap();
        let map = reg.load_map("level2_1").unwrap();
        assert_eq!(map.pixel_width(), 64.0);
        assert_eq!(map.pixel_height(), 48.0);
    }
}
