use crate::geometry::regions::{Point, Region};
use image::{Rgba, RgbaImage};

/// Fill a closed polygon with the even-odd rule, sampling at pixel centres
pub fn fill_polygon(image: &mut RgbaImage, points: &[Point], color: Rgba<u8>) {
    if points.len() < 3 {
        return;
    }
    let (width, height) = image.dimensions();
    let mut crossings: Vec<f64> = Vec::new();

    for row in 0..height {
        let y = f64::from(row) + 0.5;
        crossings.clear();

        for (index, &a) in points.iter().enumerate() {
            let Some(&b) = points.get((index + 1) % points.len()) else {
                continue;
            };
            // Half-open test counts each vertex once
            if (a.y <= y) != (b.y <= y) {
                let t = (y - a.y) / (b.y - a.y);
                crossings.push(t.mul_add(b.x - a.x, a.x));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let (Some(&start), Some(&end)) = (span.first(), span.get(1)) else {
                continue;
            };
            let first = (start - 0.5).ceil().max(0.0) as u32;
            let last = (end - 0.5).floor().min(f64::from(width) - 1.0);
            if last < 0.0 {
                continue;
            }
            for col in first..=last as u32 {
                image.put_pixel(col, row, color);
            }
        }
    }
}

/// Rasterize regions over a background of the first palette colour
///
/// Regions are painted in order, so later regions cover earlier ones where
/// they overlap.
pub fn render(regions: &[Region], palette: &[[u8; 3]], resolution: u32) -> RgbaImage {
    let background = palette.first().map_or([0, 0, 0, 255], |c| [c[0], c[1], c[2], 255]);
    let mut image = RgbaImage::from_pixel(resolution, resolution, Rgba(background));
    for region in regions {
        let Some(color) = palette.get(region.color_index) else {
            continue;
        };
        fill_polygon(
            &mut image,
            &region.points,
            Rgba([color[0], color[1], color[2], 255]),
        );
    }
    image
}
