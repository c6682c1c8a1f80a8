//! Tiled JSON map export, reduced to the object layers the game reads.
//!
//! Parsing is lenient: anything missing or malformed below the top-level
//! JSON structure degrades to a default with a warning instead of failing.

use glam::Vec2;
use serde::Deserialize;
use serde_json::Value;

use crate::api::types::EnemyKind;
use crate::core::geometry::Rect;
use crate::map::data::{
    ConsumableSpawn, EnemySpawn, MapData, DEFAULT_CONSUMABLE_KIND, DEFAULT_ENEMY_HEALTH,
    DEFAULT_ENEMY_SPEED, DEFAULT_HEAL_AMOUNT,
};

pub const COLLISIONS_LAYER: &str = "Collisions";
pub const ENEMIES_LAYER: &str = "Enemies";
pub const CONSUMABLES_LAYER: &str = "Consumables";
pub const LEVEL_END_LAYER: &str = "LevelEnd";
pub const LEVEL_END_OBJECT: &str = "LevelEnd";
pub const PLAYER_SPAWN_OBJECT: &str = "PlayerSpawn";

/// Top level of a Tiled `.json` map.
#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    /// Map width in tiles.
    #[serde(default)]
    pub width: u32,
    /// Map height in tiles.
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
}

/// A layer of any kind. Only object groups (and groups holding them) matter.
#[derive(Debug, Clone, Deserialize)]
pub struct TiledLayer {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub layer_type: String,
    #[serde(default)]
    pub objects: Vec<TiledObject>,
    /// Children of a `group` layer.
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledObject {
    #[serde(default)]
    pub name: String,
    /// Tiled ≤ 1.8 writes `type`, later versions write `class`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledProperty {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl TiledObject {
    fn is_of_type(&self, wanted: &str) -> bool {
        self.object_type == wanted || self.class == wanted
    }

    fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    fn string_property(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Null => None,
            Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Numeric property that may have been authored as a string.
    fn number_property(&self, name: &str) -> Option<f64> {
        let value = self.property(name)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            log::warn!(
                "object `{}`: property `{}` is not a number ({}), using default",
                self.name,
                name,
                value
            );
        }
        parsed
    }
}

impl TiledMap {
    /// Parse a map from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every object layer, with group layers flattened in document order.
    fn object_layers(&self) -> Vec<&TiledLayer> {
        fn walk<'a>(layers: &'a [TiledLayer], out: &mut Vec<&'a TiledLayer>) {
            for layer in layers {
                if layer.layer_type == "group" {
                    walk(&layer.layers, out);
                } else if layer.layer_type == "objectgroup" || !layer.objects.is_empty() {
                    out.push(layer);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.layers, &mut out);
        out
    }

    fn layer_objects<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TiledObject> + 'a {
        self.object_layers()
            .into_iter()
            .filter(move |layer| layer.name == name)
            .flat_map(|layer| layer.objects.iter())
    }

    pub fn player_spawn(&self) -> Option<Vec2> {
        self.object_layers()
            .into_iter()
            .flat_map(|layer| layer.objects.iter())
            .find(|obj| obj.name == PLAYER_SPAWN_OBJECT)
            .map(|obj| Vec2::new(obj.x.trunc(), obj.y.trunc()))
    }

    pub fn collision_rects(&self) -> Vec<Rect> {
        let mut rects = Vec::new();
        for obj in self.layer_objects(COLLISIONS_LAYER) {
            let rect = obj.rect();
            if rect.is_valid() {
                rects.push(rect);
            } else {
                log::warn!(
                    "skipping collider `{}` at ({}, {}): size {}x{}",
                    obj.name,
                    obj.x,
                    obj.y,
                    obj.width,
                    obj.height
                );
            }
        }
        rects
    }

    pub fn enemy_spawns(&self) -> Vec<EnemySpawn> {
        self.layer_objects(ENEMIES_LAYER)
            .filter(|obj| obj.is_of_type("enemy"))
            .map(|obj| {
                let kind = match obj.string_property("enemy_type") {
                    None => EnemyKind::default(),
                    Some(raw) => raw.parse::<EnemyKind>().unwrap_or_else(|unknown| {
                        log::warn!("unknown enemy type `{}`, spawning a wolf", unknown);
                        EnemyKind::Wolf
                    }),
                };
                let speed = obj
                    .number_property("enemy_speed")
                    .map(|v| v as f32)
                    .unwrap_or(DEFAULT_ENEMY_SPEED);
                let health = obj
                    .number_property("enemy_health")
                    .map(|v| v as i32)
                    .unwrap_or(DEFAULT_ENEMY_HEALTH);
                EnemySpawn::new(obj.position(), kind)
                    .with_speed(speed)
                    .with_health(health.max(0))
            })
            .collect()
    }

    pub fn consumable_spawns(&self) -> Vec<ConsumableSpawn> {
        self.layer_objects(CONSUMABLES_LAYER)
            .filter(|obj| obj.is_of_type("consumable"))
            .map(|obj| ConsumableSpawn {
                position: obj.position(),
                kind: obj
                    .string_property("consumable_type")
                    .unwrap_or_else(|| DEFAULT_CONSUMABLE_KIND.to_string()),
                heal: obj
                    .number_property("health_value")
                    .map(|v| v as i32)
                    .unwrap_or(DEFAULT_HEAL_AMOUNT),
                sound: obj.string_property("pickup_sound"),
            })
            .collect()
    }

    pub fn level_end(&self) -> Option<Rect> {
        self.layer_objects(LEVEL_END_LAYER)
            .find(|obj| obj.name == LEVEL_END_OBJECT)
            .map(TiledObject::rect)
    }

    /// Build the simulation's view of this map.
    pub fn into_map_data(self, id: &str) -> MapData {
        let spawn = self.player_spawn().unwrap_or_else(|| {
            log::warn!("map `{}` has no {} object, spawning at (0, 0)", id, PLAYER_SPAWN_OBJECT);
            Vec2::ZERO
        });
        if !self
            .object_layers()
            .iter()
            .any(|layer| layer.name == COLLISIONS_LAYER)
        {
            log::warn!("map `{}` has no {} layer", id, COLLISIONS_LAYER);
        }

        MapData {
            id: id.to_string(),
            tiles_wide: self.width,
            tiles_high: self.height,
            tile_width: self.tilewidth,
            tile_height: self.tileheight,
            spawn,
            collisions: self.collision_rects(),
            enemies: self.enemy_spawns(),
            consumables: self.consumable_spawns(),
            level_end: self.level_end(),
        }
    }
}
