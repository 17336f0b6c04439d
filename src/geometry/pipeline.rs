use crate::geometry::palette::{reduce_palette, segment_by_color};
use crate::geometry::raster::render;
use crate::geometry::regions::{Point, Region, extract_regions};
use crate::geometry::simplify::simplify_region;
use crate::geometry::tiling::optimize_for_tiling;
use crate::io::configuration::{GEOMETRY_WORKING_RESOLUTION, MIN_REGION_AREA, TILING_SNAP_FRACTION};
use crate::io::error::{Result, generation_error, invalid_parameter};
use crate::settings::config::GenerationConfig;
use crate::tileset::model::{EdgePattern, TileSet};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Settings of one geometrization run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometrizationParams {
    /// Colour merge tolerance in [0, 1]
    pub color_tolerance: f32,
    /// Upper bound on palette size
    pub max_colors: usize,
    /// Maximum outline deviation in output pixels
    pub simplification_tolerance: f32,
    /// Output tile edge length
    pub target_resolution: u32,
    /// Snap outlines to the tile border
    pub optimize_for_tiling: bool,
}

impl GeometrizationParams {
    /// Parameters taken from a generation config
    pub const fn from_config(config: &GenerationConfig) -> Self {
        Self {
            color_tolerance: config.color_tolerance,
            max_colors: config.max_colors as usize,
            simplification_tolerance: config.simplification_tolerance,
            target_resolution: config.target_resolution,
            optimize_for_tiling: config.optimize_for_tiling,
        }
    }
}

/// Reduces an image to flat-coloured polygons
///
/// The source is downscaled to a working grid, segmented into a reduced
/// palette, split into connected regions whose outlines are traced,
/// rescaled, simplified, optionally snapped to the tile border and finally
/// rasterized at the target resolution.
#[derive(Clone, Copy, Debug)]
pub struct GeometrizationPipeline {
    params: GeometrizationParams,
}

impl GeometrizationPipeline {
    /// Pipeline with explicit parameters
    pub const fn new(params: GeometrizationParams) -> Self {
        Self { params }
    }

    /// Pipeline configured from a generation config
    pub const fn from_config(config: &GenerationConfig) -> Self {
        Self::new(GeometrizationParams::from_config(config))
    }

    /// Geometrize `image` into a single-tile set
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image is empty
    /// - The target resolution or palette limit is zero
    /// - Segmentation yields no colours
    pub fn geometrize(&self, image: &RgbaImage) -> Result<TileSet> {
        let params = &self.params;
        if image.width() == 0 || image.height() == 0 {
            return Err(generation_error("geometrization", &"source image is empty"));
        }
        if params.target_resolution == 0 {
            return Err(invalid_parameter(
                "target_resolution",
                &params.target_resolution,
                &"must be positive",
            ));
        }
        if params.max_colors == 0 {
            return Err(invalid_parameter(
                "max_colors",
                &params.max_colors,
                &"at least one colour is required",
            ));
        }

        let working_size = GEOMETRY_WORKING_RESOLUTION.min(image.width().max(image.height()));
        let working = imageops::resize(image, working_size, working_size, FilterType::Nearest);

        let palette = segment_by_color(&working, params.color_tolerance);
        let palette = reduce_palette(&palette, params.max_colors);
        if palette.is_empty() {
            return Err(generation_error("geometrization", &"no colours found in source"));
        }

        let mut regions = extract_regions(&working, &palette, MIN_REGION_AREA);
        let scale = f64::from(params.target_resolution) / f64::from(working_size);
        for region in &mut regions {
            scale_region(region, scale);
            simplify_region(region, f64::from(params.simplification_tolerance));
        }
        if params.optimize_for_tiling {
            optimize_for_tiling(&mut regions, params.target_resolution, TILING_SNAP_FRACTION);
        }

        debug!(
            colors = palette.len(),
            regions = regions.len(),
            vertices = regions.iter().map(|r| r.points.len()).sum::<usize>(),
            "geometrization complete"
        );

        let tile = render(&regions, &palette, params.target_resolution);
        let mut tile_set = TileSet::new(params.target_resolution);
        tile_set.push(tile, EdgePattern::uniform(0));
        Ok(tile_set)
    }
}

fn scale_region(region: &mut Region, scale: f64) {
    for point in &mut region.points {
        *point = Point::new(point.x * scale, point.y * scale);
    }
}
