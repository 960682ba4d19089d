/// Everything that can go wrong while converting a map. None of these are recoverable:
/// they all point at an authoring problem in the Tiled map that must be fixed upstream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("No {0} layer found!")]
    MissingLayer(&'static str),
    #[error("More than one {0} layer found, expected exactly one")]
    DuplicateLayer(&'static str),
    #[error("No tileset matching \"{0}\" found!")]
    MissingTileset(String),
    #[error("Map is {width}x{height}, coordinates must fit in a byte (256x256 max)")]
    GridTooLarge {
        width: usize,
        height: usize,
    },
    #[error("Bad data format. Unexpected table size ({actual} tiles, expected {expected})")]
    BadLayerSize {
        expected: usize,
        actual: usize,
    },
    #[error("Tile {value} at {x},{y} does not fit in a byte")]
    TileOutOfRange {
        x: usize,
        y: usize,
        value: u32,
    },
    #[error("No entrance tile ({0}) found in the tile layer")]
    MissingEntrance(u8),
    #[error(
        "Two entrance tiles found: {},{} and {},{}",
        .first.0, .first.1, .second.0, .second.1
    )]
    DuplicateEntrance {
        first: (u8, u8),
        second: (u8, u8),
    },
    #[error("Object {0} has no sprite gid")]
    MissingGid(u32),
    #[error("Sprite ID invalid: {id} (object {object})")]
    InvalidSpriteId {
        object: u32,
        id: u32,
    },
    #[error("Object {object} is outside of the map at {x},{y}")]
    ObjectOutOfBounds {
        object: u32,
        x: f64,
        y: f64,
    },
    #[error("Object {object} name \"{name}\" is not a landmark number")]
    BadLandmark {
        object: u32,
        name: String,
    },
    #[error("Object {object} landmark {id} out of range (0..{slots})")]
    LandmarkOutOfRange {
        object: u32,
        id: i64,
        slots: usize,
    },
    #[error("Invalid smap float position at {x},{y}!")]
    InvalidFraction {
        x: f64,
        y: f64,
    },
    #[error("Two sprites in the same location: {x},{y}!")]
    SpriteCollision {
        x: u8,
        y: u8,
    },
    #[error("Too many sprites in quadrant {x}, {y}: {count} (max {max})")]
    TooManySprites {
        x: usize,
        y: usize,
        count: usize,
        max: usize,
    },
    #[error("Too many raw locations for indexing with a single byte in {table}: {bytes} bytes")]
    LandmarkOverflow {
        table: String,
        bytes: usize,
    },
    #[error("Landmark offset {offset} in {table}_raw does not fit in a byte")]
    LandmarkOffsetOverflow {
        table: String,
        offset: usize,
    },
}

pub type Result<T> = std::result::Result<T, MapError>;
