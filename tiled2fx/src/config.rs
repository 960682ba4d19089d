use serde::Deserialize;

/// Conversion parameters. Every field has a default matching the slendemake FX engine, so an
/// empty YAML document (or no config file at all) gives the stock behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tile size in pixels, used to convert object positions to map cells
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Maximum vertical distance (pixels) between an object's anchor and its centre
    #[serde(default = "default_anchor_cap")]
    pub anchor_cap: u32,
    /// Tile number marking the entrance
    #[serde(default = "default_entrance_tile")]
    pub entrance_tile: u8,
    #[serde(default = "default_page_sprite")]
    pub page_sprite: u32,
    #[serde(default = "default_slender_sprite")]
    pub slender_sprite: u32,
    /// Side of the square of cells the renderer can see at once
    #[serde(default = "default_sprite_view")]
    pub sprite_view: usize,
    /// Maximum number of sprites in any `sprite_view` square
    #[serde(default = "default_sprite_max")]
    pub sprite_max: usize,
    #[serde(default = "default_landmark_slots")]
    pub landmark_slots: usize,
    /// Keyword identifying the tiles tileset (matched against its source)
    #[serde(default = "default_tile_sheet")]
    pub tile_sheet: String,
    /// Keyword identifying the sprites tileset (matched against its source)
    #[serde(default = "default_sprite_sheet")]
    pub sprite_sheet: String,
    /// Fail instead of warning when the entrance is missing or duplicated
    #[serde(default)]
    pub strict_entrance: bool,
    #[serde(default = "default_tilemap_name")]
    pub tilemap_name: String,
    #[serde(default = "default_spritemap_name")]
    pub spritemap_name: String,
    #[serde(default = "default_pages_name")]
    pub pages_name: String,
    #[serde(default = "default_slenders_name")]
    pub slenders_name: String,
    /// Images referenced at the end of the generated file
    #[serde(default = "default_images")]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub path: String,
}

impl ImageRef {
    fn new(name: &str, path: &str) -> ImageRef {
        ImageRef {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

fn default_tile_size() -> u32 {
    16
}
fn default_anchor_cap() -> u32 {
    16
}
fn default_entrance_tile() -> u8 {
    2
}
fn default_page_sprite() -> u32 {
    10
}
fn default_slender_sprite() -> u32 {
    11
}
fn default_sprite_view() -> usize {
    13
}
fn default_sprite_max() -> usize {
    30
}
fn default_landmark_slots() -> usize {
    20
}
fn default_tile_sheet() -> String {
    "tile".to_string()
}
fn default_sprite_sheet() -> String {
    "sprite".to_string()
}
fn default_tilemap_name() -> String {
    "staticmap_fx".to_string()
}
fn default_spritemap_name() -> String {
    "staticsprites_fx".to_string()
}
fn default_pages_name() -> String {
    "pagelocs".to_string()
}
fn default_slenders_name() -> String {
    "slenderlocs".to_string()
}
fn default_images() -> Vec<ImageRef> {
    vec![
        ImageRef::new("rotbg", "../resources/rotbg.png"),
        ImageRef::new("rotbg_day", "../resources/rotbg_day.png"),
        ImageRef::new("pages", "../resources/pages_48x64.png"),
        ImageRef::new("soundgraphic", "../resources/sound_32x32.png"),
        ImageRef::new("gameover", "../resources/gameover_128x64.png"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tile_size: default_tile_size(),
            anchor_cap: default_anchor_cap(),
            entrance_tile: default_entrance_tile(),
            page_sprite: default_page_sprite(),
            slender_sprite: default_slender_sprite(),
            sprite_view: default_sprite_view(),
            sprite_max: default_sprite_max(),
            landmark_slots: default_landmark_slots(),
            tile_sheet: default_tile_sheet(),
            sprite_sheet: default_sprite_sheet(),
            strict_entrance: false,
            tilemap_name: default_tilemap_name(),
            spritemap_name: default_spritemap_name(),
            pages_name: default_pages_name(),
            slenders_name: default_slenders_name(),
            images: default_images(),
        }
    }
}

impl Config {
    pub fn from_yaml(contents: &str) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }
}
