use log::warn;

use crate::config::Config;
use crate::error::{MapError, Result};
use crate::tiled;

/// Static map, one byte per tile, X flipped compared to Tiled
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u8>,
    pub entrance: (u8, u8),
}

impl TileGrid {
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[x + y * self.width]
    }
}

/// Column of Tiled data index `i` once flipped for the raycaster
pub fn flip_x(i: usize, width: usize) -> usize {
    width - 1 - (i % width)
}

/// Fill the tile grid from the one-indexed Tiled data array and locate the entrance.
pub fn rasterize(
    layer: &tiled::TileLayer,
    tile_firstgid: u32,
    config: &Config,
) -> Result<TileGrid> {
    let width = layer.width;
    let height = layer.height;
    if layer.data.len() != width * height {
        return Err(MapError::BadLayerSize {
            expected: width * height,
            actual: layer.data.len(),
        });
    }

    let mut cells = vec![0u8; width * height];
    let mut entrance = None;
    for (i, raw) in layer.data.iter().enumerate() {
        let mx = flip_x(i, width);
        let my = i / width;
        let value = tiled::gid(*raw).saturating_sub(tile_firstgid);
        let value = u8::try_from(value).map_err(|_| MapError::TileOutOfRange {
            x: mx,
            y: my,
            value,
        })?;
        cells[mx + my * width] = value;
        if value == config.entrance_tile {
            // Coordinates fit in a byte, checked when loading the layers
            let here = (mx as u8, my as u8);
            if let Some(first) = entrance {
                if config.strict_entrance {
                    return Err(MapError::DuplicateEntrance {
                        first,
                        second: here,
                    });
                }
                warn!(
                    "Entrance found twice ({},{} and {},{}), keeping the last one",
                    first.0, first.1, here.0, here.1
                );
            }
            entrance = Some(here);
        }
    }

    let entrance = match entrance {
        Some(e) => e,
        None if config.strict_entrance => {
            return Err(MapError::MissingEntrance(config.entrance_tile))
        }
        None => {
            warn!(
                "No entrance tile ({}) found, entrance defaults to 0,0",
                config.entrance_tile
            );
            (0, 0)
        }
    };

    Ok(TileGrid {
        width,
        height,
        cells,
        entrance,
    })
}
