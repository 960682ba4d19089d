//! Tiled JSON map format, limited to what the FX map needs.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{MapError, Result};

/// Tiled keeps the flip/rotation flags in the upper bits of every gid
const GID_FLAGS: u32 = 0xf000_0000;

#[derive(Debug, Deserialize)]
pub struct MapDocument {
    pub layers: Vec<Layer>,
    pub tilesets: Vec<Tileset>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayer),
    #[serde(rename = "objectgroup")]
    Objects(ObjectGroup),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct TileLayer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectGroup {
    pub objects: Vec<Object>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Object {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub gid: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Tileset {
    pub firstgid: u32,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The two layers and the two gid offsets the converter works with
#[derive(Debug)]
pub struct MapLayers<'a> {
    pub tiles: &'a TileLayer,
    pub objects: &'a ObjectGroup,
    pub tile_firstgid: u32,
    pub sprite_firstgid: u32,
}

/// Strip Tiled flip flags from a gid
pub fn gid(raw: u32) -> u32 {
    raw & !GID_FLAGS
}

impl MapDocument {
    pub fn from_json(json: &str) -> serde_json::Result<MapDocument> {
        serde_json::from_str(json)
    }

    pub fn layers(&self, config: &Config) -> Result<MapLayers<'_>> {
        let mut tiles = None;
        let mut objects = None;
        for layer in &self.layers {
            match layer {
                Layer::Tiles(t) => {
                    if tiles.replace(t).is_some() {
                        return Err(MapError::DuplicateLayer("tile"));
                    }
                }
                Layer::Objects(o) => {
                    if objects.replace(o).is_some() {
                        return Err(MapError::DuplicateLayer("object"));
                    }
                }
                Layer::Other => (),
            }
        }

        // Embedded tilesets have no source, fall back on their name
        let mut tile_firstgid = None;
        let mut sprite_firstgid = None;
        for tileset in &self.tilesets {
            let key = tileset
                .source
                .as_deref()
                .or(tileset.name.as_deref())
                .unwrap_or("");
            if key.contains(config.tile_sheet.as_str()) {
                tile_firstgid = Some(tileset.firstgid);
            } else if key.contains(config.sprite_sheet.as_str()) {
                sprite_firstgid = Some(tileset.firstgid);
            }
        }

        let tiles = tiles.ok_or(MapError::MissingLayer("tile"))?;
        let objects = objects.ok_or(MapError::MissingLayer("object"))?;
        let tile_firstgid =
            tile_firstgid.ok_or_else(|| MapError::MissingTileset(config.tile_sheet.clone()))?;
        let sprite_firstgid =
            sprite_firstgid.ok_or_else(|| MapError::MissingTileset(config.sprite_sheet.clone()))?;

        if tiles.width > 256 || tiles.height > 256 {
            return Err(MapError::GridTooLarge {
                width: tiles.width,
                height: tiles.height,
            });
        }

        Ok(MapLayers {
            tiles,
            objects,
            tile_firstgid,
            sprite_firstgid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "width": 2, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [
            {"type": "imagelayer", "image": "sky.png"},
            {"type": "tilelayer", "width": 2, "height": 1, "data": [1, 3]},
            {"type": "objectgroup", "objects": [
                {"id": 4, "name": "7", "x": 8, "y": 16, "width": 16, "height": 16, "gid": 25}
            ]}
        ],
        "tilesets": [
            {"firstgid": 1, "source": "../resources/tiles.tsx"},
            {"firstgid": 15, "source": "../resources/sprites.tsx"}
        ]
    }"#;

    #[test]
    fn finds_layers_and_firstgids() {
        let doc = MapDocument::from_json(MAP).unwrap();
        let layers = doc.layers(&Config::default()).unwrap();
        assert_eq!(layers.tiles.width, 2);
        assert_eq!(layers.tiles.data, vec![1, 3]);
        assert_eq!(layers.objects.objects.len(), 1);
        assert_eq!(layers.objects.objects[0].gid, Some(25));
        assert_eq!(layers.objects.objects[0].name, "7");
        assert_eq!(layers.tile_firstgid, 1);
        assert_eq!(layers.sprite_firstgid, 15);
    }

    #[test]
    fn missing_sprite_tileset() {
        let doc = MapDocument::from_json(
            r#"{"layers": [
                {"type": "tilelayer", "width": 1, "height": 1, "data": [0]},
                {"type": "objectgroup", "objects": []}
            ], "tilesets": [{"firstgid": 1, "source": "tiles.tsx"}]}"#,
        )
        .unwrap();
        assert_eq!(
            doc.layers(&Config::default()).unwrap_err(),
            MapError::MissingTileset("sprite".into())
        );
    }

    #[test]
    fn missing_object_layer() {
        let doc = MapDocument::from_json(
            r#"{"layers": [{"type": "tilelayer", "width": 1, "height": 1, "data": [0]}],
                "tilesets": [{"firstgid": 1, "source": "tiles.tsx"}]}"#,
        )
        .unwrap();
        assert_eq!(
            doc.layers(&Config::default()).unwrap_err(),
            MapError::MissingLayer("object")
        );
    }

    #[test]
    fn two_tile_layers_are_rejected() {
        let doc = MapDocument::from_json(
            r#"{"layers": [
                {"type": "tilelayer", "width": 1, "height": 1, "data": [0]},
                {"type": "tilelayer", "width": 1, "height": 1, "data": [0]}
            ], "tilesets": []}"#,
        )
        .unwrap();
        assert_eq!(
            doc.layers(&Config::default()).unwrap_err(),
            MapError::DuplicateLayer("tile")
        );
    }

    #[test]
    fn embedded_tileset_matched_by_name() {
        let doc = MapDocument::from_json(
            r#"{"layers": [
                {"type": "tilelayer", "width": 1, "height": 1, "data": [0]},
                {"type": "objectgroup", "objects": []}
            ], "tilesets": [
                {"firstgid": 1, "name": "walltiles"},
                {"firstgid": 9, "name": "spritesheet"}
            ]}"#,
        )
        .unwrap();
        let layers = doc.layers(&Config::default()).unwrap();
        assert_eq!(layers.tile_firstgid, 1);
        assert_eq!(layers.sprite_firstgid, 9);
    }

    #[test]
    fn oversized_grid() {
        let data = vec![0; 257];
        let json = format!(
            r#"{{"layers": [
                {{"type": "tilelayer", "width": 257, "height": 1, "data": {:?}}},
                {{"type": "objectgroup", "objects": []}}
            ], "tilesets": [
                {{"firstgid": 1, "source": "tiles.tsx"}},
                {{"firstgid": 9, "source": "sprites.tsx"}}
            ]}}"#,
            data
        );
        let doc = MapDocument::from_json(&json).unwrap();
        assert_eq!(
            doc.layers(&Config::default()).unwrap_err(),
            MapError::GridTooLarge {
                width: 257,
                height: 1
            }
        );
    }

    #[test]
    fn flip_flags_are_masked() {
        assert_eq!(gid(0x8000_0005), 5);
        assert_eq!(gid(0x2000_0005), 5);
        assert_eq!(gid(12), 12);
    }
}
