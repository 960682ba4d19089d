//! Conversion of Tiled maps into FX data for the slendemake raycaster.
//!
//! The map goes through four stages: the [`tiled`] loader finds the tile and object layers,
//! [`tiles`] builds the static map, [`objects`] places the sprites and landmark locations, and
//! [`density`] makes sure the renderer sprite budget holds before [`emit`] writes it all out.

pub mod config;
pub mod density;
pub mod emit;
pub mod error;
pub mod objects;
pub mod tiled;
pub mod tiles;

use log::{debug, info};

pub use config::Config;
pub use emit::{write_fx, LandmarkTables};
pub use error::{MapError, Result};
pub use objects::SpriteGrid;
pub use tiled::MapDocument;
pub use tiles::TileGrid;

/// A fully converted and validated map, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct FxMap {
    pub tiles: TileGrid,
    pub sprites: SpriteGrid,
    pub pages: LandmarkTables,
    pub slenders: LandmarkTables,
}

/// Run every conversion stage. Nothing is returned unless all checks pass.
pub fn convert(document: &MapDocument, config: &Config) -> Result<FxMap> {
    let layers = document.layers(config)?;

    info!("Reading map data");
    let tiles = tiles::rasterize(layers.tiles, layers.tile_firstgid, config)?;
    info!("Entrance at {}, {}", tiles.entrance.0, tiles.entrance.1);

    info!("Reading {} sprite data", layers.objects.objects.len());
    let placement = objects::place(
        &layers.objects.objects,
        tiles.width,
        tiles.height,
        layers.sprite_firstgid,
        config,
    )?;

    density::check(&placement.sprites, config.sprite_view, config.sprite_max)?;
    if log::log_enabled!(log::Level::Debug) {
        if let Some((x, y, count)) = density::busiest(&placement.sprites, config.sprite_view) {
            debug!(
                "Busiest view at {}, {}: {} sprites (max {})",
                x, y, count, config.sprite_max
            );
        }
        let pages = serde_json::to_string(&placement.pages).unwrap_or_default();
        let slenders = serde_json::to_string(&placement.slenders).unwrap_or_default();
        debug!("pages: {}", pages);
        debug!("slenders: {}", slenders);
    }
    let pages = LandmarkTables::build(&config.pages_name, &placement.pages)?;
    let slenders = LandmarkTables::build(&config.slenders_name, &placement.slenders)?;

    Ok(FxMap {
        tiles,
        sprites: placement.sprites,
        pages,
        slenders,
    })
}

/// Parse, convert and render a Tiled JSON document in one go
pub fn convert_json(json: &str, config: &Config) -> anyhow::Result<String> {
    let document = MapDocument::from_json(json)?;
    let map = convert(&document, config)?;
    let mut out = Vec::new();
    write_fx(&mut out, &map, config)?;
    Ok(String::from_utf8(out)?)
}
