pub mod data;
pub mod registry;
pub mod tiled;

use std::sync::Arc;

use thiserror::Error;

pub use data::{ConsumableSpawn, EnemySpawn, MapData};
pub use registry::MapRegistry;

/// Why a map could not be handed to the session.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no levels configured")]
    NoLevels,
    #[error("map `{0}` is not registered")]
    NotFound(String),
    #[error("map `{id}` is not valid Tiled JSON: {source}")]
    Parse {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where level data comes from. The session asks for a map by identifier
/// on start and on every level transition.
pub trait MapSource {
    fn load_map(&self, id: &str) -> Result<Arc<MapData>, MapError>;
}

impl<S: MapSource + ?Sized> MapSource for &S {
    fn load_map(&self, id: &str) -> Result<Arc<MapData>, MapError> {
        (**self).load_map(id)
    }
}

impl<S: MapSource + ?Sized> MapSource for Box<S> {
    fn load_map(&self, id: &str) -> Result<Arc<MapData>, MapError> {
        (**self).load_map(id)
    }
}
