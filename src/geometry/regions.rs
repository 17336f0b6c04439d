//! Connected colour regions and their traced outlines

use crate::geometry::palette::label_pixels;
use ndarray::Array2;

/// Point in pixel coordinates; pixel centres sit at `n + 0.5`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position, growing downwards
    pub y: f64,
}

impl Point {
    /// Point at the given coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Centre of pixel `(col, row)`
    pub fn pixel_center(col: usize, row: usize) -> Self {
        Self::new(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One connected area of a single palette colour
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Index into the palette
    pub color_index: usize,
    /// Closed outline, first point not repeated at the end
    pub points: Vec<Point>,
    /// Number of pixels in the area
    pub area: usize,
}

const UNASSIGNED: usize = usize::MAX;

/// Clockwise neighbour offsets starting east, y pointing down
const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const WEST: usize = 4;

/// Palette label per pixel, indexed `[row, col]`
pub fn label_grid(image: &image::RgbaImage, palette: &[[u8; 3]]) -> Array2<usize> {
    let shape = (image.height() as usize, image.width() as usize);
    let labels = label_pixels(image, palette);
    Array2::from_shape_vec(shape, labels).unwrap_or_else(|_| Array2::zeros(shape))
}

/// Split an image into 4-connected single-colour regions with outlines
///
/// Regions smaller than `min_area` pixels are dropped. The result is sorted
/// by area, largest first, so painting in order lets smaller regions show on
/// top of the ones enclosing them.
pub fn extract_regions(
    image: &image::RgbaImage,
    palette: &[[u8; 3]],
    min_area: usize,
) -> Vec<Region> {
    if palette.is_empty() || image.width() == 0 || image.height() == 0 {
        return Vec::new();
    }

    let labels = label_grid(image, palette);
    let (components, seeds) = connected_components(&labels);

    let mut regions: Vec<Region> = seeds
        .into_iter()
        .enumerate()
        .filter(|(_, seed)| seed.area >= min_area)
        .map(|(id, seed)| Region {
            color_index: seed.label,
            points: trace_outline(&components, id, seed.start),
            area: seed.area,
        })
        .collect();

    regions.sort_by(|a, b| b.area.cmp(&a.area).then_with(|| a.color_index.cmp(&b.color_index)));
    regions
}

/// First pixel, label and size of one connected component
#[derive(Clone, Copy, Debug)]
struct ComponentSeed {
    start: (usize, usize),
    label: usize,
    area: usize,
}

/// 4-connected flood fill; returns component ids per pixel and per-component seeds
fn connected_components(labels: &Array2<usize>) -> (Array2<usize>, Vec<ComponentSeed>) {
    let (rows, cols) = labels.dim();
    let mut components = Array2::from_elem((rows, cols), UNASSIGNED);
    let mut seeds = Vec::new();
    let mut stack = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            if components.get((row, col)).copied() != Some(UNASSIGNED) {
                continue;
            }
            let Some(&label) = labels.get((row, col)) else {
                continue;
            };

            let id = seeds.len();
            let mut area = 0usize;
            stack.push((row, col));
            if let Some(slot) = components.get_mut((row, col)) {
                *slot = id;
            }

            while let Some((r, c)) = stack.pop() {
                area += 1;
                let neighbours = [
                    r.checked_sub(1).map(|up| (up, c)),
                    Some((r + 1, c)),
                    c.checked_sub(1).map(|left| (r, left)),
                    Some((r, c + 1)),
                ];
                for (nr, nc) in neighbours.into_iter().flatten() {
                    if labels.get((nr, nc)) != Some(&label) {
                        continue;
                    }
                    if let Some(slot) = components
                        .get_mut((nr, nc))
                        .filter(|slot| **slot == UNASSIGNED)
                    {
                        *slot = id;
                        stack.push((nr, nc));
                    }
                }
            }

            seeds.push(ComponentSeed {
                start: (row, col),
                label,
                area,
            });
        }
    }

    (components, seeds)
}

fn neighbour(
    components: &Array2<usize>,
    (row, col): (usize, usize),
    direction: usize,
) -> Option<(usize, usize)> {
    let (dx, dy) = DIRECTIONS.get(direction % 8).copied()?;
    let r = row.checked_add_signed(dy)?;
    let c = col.checked_add_signed(dx)?;
    components.get((r, c)).map(|_| (r, c))
}

/// Moore-neighbour tracing of one component's outer boundary
///
/// `start` must be the component's first pixel in raster order, so its west
/// neighbour lies outside the component.
fn trace_outline(components: &Array2<usize>, id: usize, start: (usize, usize)) -> Vec<Point> {
    let inside = |cell: (usize, usize)| components.get(cell) == Some(&id);
    let mut outline = vec![Point::pixel_center(start.1, start.0)];
    let guard = 4 * components.len() + 8;

    let mut current = start;
    let mut backtrack = WEST;
    let mut first_move: Option<usize> = None;

    for _ in 0..guard {
        let next = (1..=8)
            .map(|k| (backtrack + k) % 8)
            .find_map(|d| neighbour(components, current, d).filter(|&c| inside(c)).map(|c| (c, d)));
        let Some((cell, direction)) = next else {
            break;
        };

        if current == start {
            match first_move {
                Some(first) if first == direction => break,
                None => first_move = Some(direction),
                Some(_) => {}
            }
        }

        if cell != start {
            outline.push(Point::pixel_center(cell.1, cell.0));
        }
        current = cell;
        // Resume the clockwise scan from the last background neighbour
        backtrack = if direction % 2 == 0 {
            (direction + 6) % 8
        } else {
            (direction + 5) % 8
        };
    }

    outline
}
