//! FX data script generation.

use std::io::{self, Write};

use log::info;

use crate::config::Config;
use crate::error::{MapError, Result};
use crate::objects::{Landmarks, SpriteGrid, SPRITE_BYTES};
use crate::tiles::TileGrid;
use crate::FxMap;

/// Bytes per landmark location (x, y)
const LOCATION_BYTES: usize = 2;

/// The three views of a landmark list the game uses:
/// `raw` is every non-empty landmark as a count followed by its locations,
/// `trueraw` all locations one after the other, and `offsets` the start of each
/// landmark in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkTables {
    pub name: String,
    pub raw: Vec<u8>,
    pub trueraw: Vec<u8>,
    pub offsets: Vec<u8>,
}

impl LandmarkTables {
    pub fn build(name: &str, landmarks: &Landmarks) -> Result<LandmarkTables> {
        let mut raw = Vec::new();
        let mut trueraw = Vec::new();
        let mut offsets = Vec::new();
        for (_, locations) in landmarks.iter() {
            let offset = u8::try_from(raw.len()).map_err(|_| MapError::LandmarkOffsetOverflow {
                table: name.to_string(),
                offset: raw.len(),
            })?;
            offsets.push(offset);
            // At most 127 once the trueraw check below passes
            raw.push(locations.len() as u8);
            for (x, y) in locations {
                raw.push(*x);
                raw.push(*y);
                trueraw.push(*x);
                trueraw.push(*y);
            }
        }
        if trueraw.len() > u8::MAX as usize {
            return Err(MapError::LandmarkOverflow {
                table: name.to_string(),
                bytes: trueraw.len(),
            });
        }
        info!("{} positions: {}", name, trueraw.len() / LOCATION_BYTES);
        Ok(LandmarkTables {
            name: name.to_string(),
            raw,
            trueraw,
            offsets,
        })
    }

    /// Number of locations
    pub fn positions(&self) -> usize {
        self.trueraw.len() / LOCATION_BYTES
    }

    /// The `raw` table split per landmark
    fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let ends = self
            .offsets
            .iter()
            .skip(1)
            .map(|o| *o as usize)
            .chain(std::iter::once(self.raw.len()));
        self.offsets
            .iter()
            .zip(ends)
            .map(|(start, end)| &self.raw[*start as usize..end])
    }

    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "uint8_t {}_raw[] = {{", self.name)?;
        for row in self.rows() {
            write!(out, "{}, ", row[0])?;
            for v in &row[1..] {
                write!(out, "{},", v)?;
            }
            writeln!(out)?;
        }
        write!(out, "}}\n\n")?;

        writeln!(out, "uint8_t {}_trueraw[] = {{", self.name)?;
        writeln!(out, "{},", self.positions())?;
        for location in self.trueraw.chunks(LOCATION_BYTES) {
            for v in location {
                write!(out, "{},", v)?;
            }
            write!(out, " ")?;
        }
        write!(out, "\n}}\n\n")?;

        writeln!(out, "uint8_t {}_offsets[] = {{", self.name)?;
        for o in &self.offsets {
            write!(out, "{},", o)?;
        }
        write!(out, "\n}}\n\n")
    }
}

fn write_tiles<W: Write>(out: &mut W, name: &str, tiles: &TileGrid) -> io::Result<()> {
    writeln!(out, "uint8_t {name}[] = {{")?;
    for y in 0..tiles.height {
        for x in 0..tiles.width {
            write!(out, "{},", tiles.get(x, y))?;
        }
        writeln!(out)?;
    }
    write!(out, "}}\n\n")
}

fn write_sprites<W: Write>(out: &mut W, name: &str, sprites: &SpriteGrid) -> io::Result<()> {
    writeln!(out, "uint8_t {name}[] = {{")?;
    for row in sprites.cells.chunks(sprites.width.max(1) * SPRITE_BYTES) {
        for cell in row.chunks(SPRITE_BYTES) {
            for v in cell {
                write!(out, "{},", v)?;
            }
            write!(out, " ")?;
        }
        writeln!(out)?;
    }
    write!(out, "}}\n\n")
}

/// Write the whole FX data script for a converted map
pub fn write_fx<W: Write>(out: &mut W, map: &FxMap, config: &Config) -> io::Result<()> {
    writeln!(out, "//Entrance: {},{}", map.tiles.entrance.0, map.tiles.entrance.1)?;
    write_tiles(out, &config.tilemap_name, &map.tiles)?;
    write_sprites(out, &config.spritemap_name, &map.sprites)?;
    map.pages.write(out)?;
    map.slenders.write(out)?;
    for image in &config.images {
        write!(out, "image_t {} = \"{}\"\n\n", image.name, image.path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(tables: &LandmarkTables) -> String {
        let mut out = Vec::new();
        tables.write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn raw_entries_are_count_prefixed() {
        let mut landmarks = Landmarks::new();
        landmarks.push(4, (1, 2));
        landmarks.push(1, (7, 8));
        landmarks.push(4, (3, 4));
        landmarks.push(4, (5, 6));
        let t = LandmarkTables::build("pagelocs", &landmarks).unwrap();
        assert_eq!(t.raw, vec![1, 7, 8, 3, 1, 2, 3, 4, 5, 6]);
        assert_eq!(t.offsets, vec![0, 3]);
        assert_eq!(t.raw[t.offsets[1] as usize], 3);
        assert_eq!(t.trueraw, vec![7, 8, 1, 2, 3, 4, 5, 6]);
        assert_eq!(t.positions(), 4);
    }

    #[test]
    fn landmark_text() {
        let mut landmarks = Landmarks::new();
        landmarks.push(0, (10, 11));
        landmarks.push(2, (1, 2));
        landmarks.push(2, (3, 4));
        let t = LandmarkTables::build("slenderlocs", &landmarks).unwrap();
        assert_eq!(
            text(&t),
            "uint8_t slenderlocs_raw[] = {\n\
             1, 10,11,\n\
             2, 1,2,3,4,\n\
             }\n\n\
             uint8_t slenderlocs_trueraw[] = {\n\
             3,\n\
             10,11, 1,2, 3,4, \n\
             }\n\n\
             uint8_t slenderlocs_offsets[] = {\n\
             0,3,\n\
             }\n\n"
        );
    }

    #[test]
    fn empty_landmarks() {
        let t = LandmarkTables::build("pagelocs", &Landmarks::new()).unwrap();
        assert_eq!(
            text(&t),
            "uint8_t pagelocs_raw[] = {\n}\n\n\
             uint8_t pagelocs_trueraw[] = {\n0,\n\n}\n\n\
             uint8_t pagelocs_offsets[] = {\n\n}\n\n"
        );
    }

    fn spread(pairs: usize) -> Landmarks {
        let mut landmarks = Landmarks::new();
        for i in 0..pairs {
            landmarks.push(i % 2, ((i % 200) as u8, (i / 200) as u8));
        }
        landmarks
    }

    #[test]
    fn overflow_limit() {
        assert!(LandmarkTables::build("pagelocs", &spread(127)).is_ok());
        assert_eq!(
            LandmarkTables::build("pagelocs", &spread(128)).unwrap_err(),
            MapError::LandmarkOverflow {
                table: "pagelocs".into(),
                bytes: 256
            }
        );
    }

    #[test]
    fn offsets_must_fit_a_byte() {
        let mut landmarks = Landmarks::new();
        for i in 0..127 {
            landmarks.push(i / 9, (0, 0));
        }
        // 14 landmarks of 19 bytes in raw, the 15th one starts at 266
        assert!(matches!(
            LandmarkTables::build("pagelocs", &landmarks).unwrap_err(),
            MapError::LandmarkOffsetOverflow { offset: 266, .. }
        ));
    }
}
