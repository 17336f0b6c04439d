use crate::io::configuration::PREVIEW_MAX_TILE_EDGE;
use crate::io::error::{Result, integrity_error, invalid_parameter};
use crate::layout::solver::LayoutSolution;
use crate::tileset::model::TileSet;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use ndarray::Array2;

/// Tiled preview of an accepted tile set
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewArtifact {
    /// Snapshot of the previewed tiles
    pub tile_set: TileSet,
    /// Preview width in tiles
    pub cols: u32,
    /// Preview height in tiles
    pub rows: u32,
    /// Tile index per preview cell, indexed `[row, col]`
    pub placement: Array2<usize>,
    /// Composited preview image
    pub composite: RgbaImage,
}

/// Renders preview artifacts on screen; the engine only builds the data
pub trait PreviewHost: Send + Sync {
    /// Show a preview
    fn present(&self, preview: &PreviewArtifact);

    /// Remove the shown preview
    fn dismiss(&self) {}
}

/// Compose a `cols`×`rows` preview
///
/// With a layout, cells repeat the layout grid; otherwise every cell shows
/// tile 0. Tiles larger than the preview limit are downscaled.
///
/// # Errors
///
/// Returns an error if the preview has no cells or the tile set is empty
pub fn build_preview(
    tile_set: &TileSet,
    layout: Option<&LayoutSolution>,
    cols: u32,
    rows: u32,
) -> Result<PreviewArtifact> {
    if cols == 0 || rows == 0 {
        return Err(invalid_parameter(
            "preview",
            &format!("{cols}x{rows}"),
            &"preview must have at least one cell",
        ));
    }
    if tile_set.is_empty() || tile_set.tile_size == 0 {
        return Err(integrity_error(&"nothing to preview"));
    }

    let placement = Array2::from_shape_fn((rows as usize, cols as usize), |(row, col)| {
        layout
            .and_then(|solution| {
                let (height, width) = solution.grid.dim();
                if height == 0 || width == 0 {
                    return None;
                }
                solution.grid.get((row % height, col % width)).copied()
            })
            .filter(|&index| index < tile_set.len())
            .unwrap_or(0)
    });

    let edge = tile_set.tile_size.min(PREVIEW_MAX_TILE_EDGE);
    let thumbnails: Vec<RgbaImage> = tile_set
        .tiles
        .iter()
        .map(|tile| {
            if tile.dimensions() == (edge, edge) {
                tile.clone()
            } else {
                imageops::resize(tile, edge, edge, FilterType::Triangle)
            }
        })
        .collect();

    let mut composite = RgbaImage::new(cols * edge, rows * edge);
    for ((row, col), &index) in placement.indexed_iter() {
        if let Some(thumbnail) = thumbnails.get(index) {
            imageops::replace(
                &mut composite,
                thumbnail,
                col as i64 * i64::from(edge),
                row as i64 * i64::from(edge),
            );
        }
    }

    Ok(PreviewArtifact {
        tile_set: tile_set.clone(),
        cols,
        rows,
        placement,
        composite,
    })
}
