use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Config;
use crate::error::{MapError, Result};
use crate::tiled::{self, Object};

/// Bytes per sprite map cell: sprite id, then packed position inside the cell
pub const SPRITE_BYTES: usize = 2;

/// Sub-cell positions are stored on 4 bits per axis
const FRACTION_STEPS: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u8>,
}

impl SpriteGrid {
    pub fn new(width: usize, height: usize) -> SpriteGrid {
        SpriteGrid {
            width,
            height,
            cells: vec![0; width * height * SPRITE_BYTES],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        SPRITE_BYTES * (x + y * self.width)
    }

    pub fn id(&self, x: usize, y: usize) -> u8 {
        self.cells[self.index(x, y)]
    }

    #[cfg(test)]
    pub fn fraction(&self, x: usize, y: usize) -> u8 {
        self.cells[self.index(x, y) + 1]
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.id(x, y) != 0
    }

    /// Put a sprite in a cell. Only one sprite per cell is allowed.
    pub fn put(&mut self, x: u8, y: u8, id: u8, fraction: u8) -> Result<()> {
        let i = self.index(x as usize, y as usize);
        if self.cells[i] != 0 {
            return Err(MapError::SpriteCollision { x, y });
        }
        self.cells[i] = id;
        self.cells[i + 1] = fraction;
        Ok(())
    }
}

/// Locations grouped by landmark number. Several locations may share a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Landmarks {
    locations: BTreeMap<usize, Vec<(u8, u8)>>,
}

impl Landmarks {
    pub fn new() -> Landmarks {
        Landmarks::default()
    }

    pub fn push(&mut self, landmark: usize, location: (u8, u8)) {
        self.locations.entry(landmark).or_default().push(location);
    }

    /// Non-empty landmarks in increasing landmark order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[(u8, u8)])> {
        self.locations
            .iter()
            .filter(|(_, l)| !l.is_empty())
            .map(|(k, l)| (*k, l.as_slice()))
    }

    #[cfg(test)]
    pub fn get(&self, landmark: usize) -> &[(u8, u8)] {
        self.locations
            .get(&landmark)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of locations, all landmarks included
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locations.values().map(|l| l.len()).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub sprites: SpriteGrid,
    pub pages: Landmarks,
    pub slenders: Landmarks,
}

/// Continuous map position of an object, X flipped like the tiles.
/// Tall objects are anchored at most `anchor_cap` pixels above their bottom.
pub fn grid_position(object: &Object, width: usize, config: &Config) -> (f64, f64) {
    let tile_size = config.tile_size as f64;
    let half_width = (object.width / 2.0).floor();
    let half_height = (object.height / 2.0).floor().min(config.anchor_cap as f64);
    let x = width as f64 - (object.x + half_width) / tile_size;
    let y = (object.y - half_height) / tile_size;
    (x, y)
}

/// Pack the position inside the cell: X on the low nibble, Y on the high one
pub fn pack_fraction(x: f64, y: f64) -> Result<u8> {
    let fx = (FRACTION_STEPS * (x - x.floor())).floor() as u32;
    let fy = (FRACTION_STEPS * (y - y.floor())).floor() as u32;
    u8::try_from(fx + (fy << 4)).map_err(|_| MapError::InvalidFraction { x, y })
}

fn landmark_id(object: &Object, slots: usize) -> Result<usize> {
    let id = object
        .name
        .trim()
        .parse::<i64>()
        .map_err(|_| MapError::BadLandmark {
            object: object.id,
            name: object.name.clone(),
        })?;
    if id < 0 || id as u64 >= slots as u64 {
        return Err(MapError::LandmarkOutOfRange {
            object: object.id,
            id,
            slots,
        });
    }
    Ok(id as usize)
}

/// Route every object either to the sprite map or to one of the landmark lists.
pub fn place(
    objects: &[Object],
    width: usize,
    height: usize,
    sprite_firstgid: u32,
    config: &Config,
) -> Result<Placement> {
    let mut sprites = SpriteGrid::new(width, height);
    let mut pages = Landmarks::new();
    let mut slenders = Landmarks::new();

    for object in objects {
        let raw = object.gid.ok_or(MapError::MissingGid(object.id))?;
        let id = tiled::gid(raw).saturating_sub(sprite_firstgid);
        if id == 0 {
            return Err(MapError::InvalidSpriteId {
                object: object.id,
                id,
            });
        }

        let (x, y) = grid_position(object, width, config);
        let mapx = x.floor();
        let mapy = y.floor();
        if mapx < 0.0 || mapy < 0.0 || mapx >= width as f64 || mapy >= height as f64 {
            return Err(MapError::ObjectOutOfBounds {
                object: object.id,
                x,
                y,
            });
        }
        // Map dimensions are at most 256, so cell coordinates fit in a byte
        let (mapx, mapy) = (mapx as u8, mapy as u8);

        if id == config.page_sprite {
            pages.push(landmark_id(object, config.landmark_slots)?, (mapx, mapy));
            continue;
        }
        if id == config.slender_sprite {
            slenders.push(landmark_id(object, config.landmark_slots)?, (mapx, mapy));
            continue;
        }

        let id = u8::try_from(id).map_err(|_| MapError::InvalidSpriteId {
            object: object.id,
            id,
        })?;
        sprites.put(mapx, mapy, id, pack_fraction(x, y)?)?;
    }

    Ok(Placement {
        sprites,
        pages,
        slenders,
    })
}
