use crate::geometry::regions::Region;

/// Snap region vertices near the tile border onto it
///
/// Vertices within `snap_fraction × resolution` (at least one pixel) of a
/// border are moved onto that border, and their position along the border is
/// rounded to the same step. Shapes touching the left edge then meet the
/// right edge at matching coordinates, so they continue across a repeat.
pub fn optimize_for_tiling(regions: &mut [Region], resolution: u32, snap_fraction: f64) {
    let size = f64::from(resolution);
    if size <= 0.0 {
        return;
    }
    let snap = (size * snap_fraction).max(1.0);

    for point in regions.iter_mut().flat_map(|region| region.points.iter_mut()) {
        let on_vertical = snap_axis(&mut point.x, size, snap);
        let on_horizontal = snap_axis(&mut point.y, size, snap);
        if on_vertical && !on_horizontal {
            point.y = quantize(point.y, size, snap);
        }
        if on_horizontal && !on_vertical {
            point.x = quantize(point.x, size, snap);
        }
    }
}

/// Move a coordinate onto 0 or `size` when within `snap`; reports whether it moved there
fn snap_axis(value: &mut f64, size: f64, snap: f64) -> bool {
    if *value <= snap {
        *value = 0.0;
        true
    } else if *value >= size - snap {
        *value = size;
        true
    } else {
        false
    }
}

fn quantize(value: f64, size: f64, step: f64) -> f64 {
    ((value / step).round() * step).clamp(0.0, size)
}
