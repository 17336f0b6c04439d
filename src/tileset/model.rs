//! Tile set value type with per-tile edge patterns

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// One side of a square tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Upper edge
    Top,
    /// Right-hand edge
    Right,
    /// Lower edge
    Bottom,
    /// Left-hand edge
    Left,
}

impl Side {
    /// All sides in clockwise order starting at the top
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side facing this one across a shared edge
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Lowercase name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Edge classes of a tile, one per side
///
/// Two tiles may share an edge when the class on one side equals the class on
/// the facing side of the neighbour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgePattern {
    /// Class of the upper edge
    pub top: u32,
    /// Class of the right-hand edge
    pub right: u32,
    /// Class of the lower edge
    pub bottom: u32,
    /// Class of the left-hand edge
    pub left: u32,
}

impl EdgePattern {
    /// Pattern with explicit classes per side
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Pattern with the same class on every side
    pub const fn uniform(class: u32) -> Self {
        Self::new(class, class, class, class)
    }

    /// Class on the given side
    pub const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Classes as `[top, right, bottom, left]`
    pub const fn as_array(&self) -> [u32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Whether `other` may sit on `side` of this tile
    pub const fn matches(&self, other: &Self, side: Side) -> bool {
        self.get(side) == other.get(side.opposite())
    }
}

/// Ordered raster tiles with a parallel list of edge patterns
///
/// Created fresh by every generation call. Tiles are owned pixel buffers; a
/// zero-sized buffer stands for a missing tile and fails validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileSet {
    /// Tile pixel buffers
    pub tiles: Vec<RgbaImage>,
    /// Edge pattern per tile, same length as `tiles`
    pub edge_patterns: Vec<EdgePattern>,
    /// Edge length every tile must have
    pub tile_size: u32,
    /// Seam difference metric in [0, 1], lower is more seamless
    pub quality: f32,
}

impl TileSet {
    /// Empty set for tiles of the given size
    pub const fn new(tile_size: u32) -> Self {
        Self {
            tiles: Vec::new(),
            edge_patterns: Vec::new(),
            tile_size,
            quality: 0.0,
        }
    }

    /// Append a tile together with its edge pattern
    pub fn push(&mut self, tile: RgbaImage, pattern: EdgePattern) {
        self.tiles.push(tile);
        self.edge_patterns.push(pattern);
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the set holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at `index`
    pub fn tile(&self, index: usize) -> Option<&RgbaImage> {
        self.tiles.get(index)
    }

    /// Edge pattern of the tile at `index`
    pub fn pattern(&self, index: usize) -> Option<&EdgePattern> {
        self.edge_patterns.get(index)
    }

    /// Non-empty, positive tile size and no missing tiles
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
            && self.tile_size > 0
            && self.edge_patterns.len() == self.tiles.len()
            && self
                .tiles
                .iter()
                .all(|tile| tile.width() > 0 && tile.height() > 0)
    }
}
