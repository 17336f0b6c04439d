use crate::geometry::regions::{Point, Region};

/// Perpendicular distance of `point` from the segment `start`-`end`
pub fn segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx.mul_add(dx, dy * dy);
    if length_sq <= f64::EPSILON {
        return point.distance(start);
    }
    let projection = (point.x - start.x).mul_add(dx, (point.y - start.y) * dy);
    let t = (projection / length_sq).clamp(0.0, 1.0);
    point.distance(Point::new(t.mul_add(dx, start.x), t.mul_add(dy, start.y)))
}

/// Douglas-Peucker on an open polyline, keeping both endpoints
///
/// Iterative over an explicit stack of index ranges.
pub fn simplify_polyline(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    let last = points.len() - 1;
    if let Some(slot) = keep.first_mut() {
        *slot = true;
    }
    if let Some(slot) = keep.last_mut() {
        *slot = true;
    }

    let mut ranges = vec![(0usize, last)];
    while let Some((first, end)) = ranges.pop() {
        let (Some(&a), Some(&b)) = (points.get(first), points.get(end)) else {
            continue;
        };
        let farthest = (first + 1..end)
            .filter_map(|i| points.get(i).map(|&p| (i, segment_distance(p, a, b))))
            .max_by(|x, y| x.1.total_cmp(&y.1));

        if let Some((index, _)) = farthest.filter(|&(_, d)| d > tolerance) {
            if let Some(slot) = keep.get_mut(index) {
                *slot = true;
            }
            ranges.push((first, index));
            ranges.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&point, kept)| kept.then_some(point))
        .collect()
}

/// Simplify a closed outline so no removed vertex strays beyond `tolerance`
///
/// Outlines of three or fewer vertices are returned unchanged. The ring is
/// split at the vertex farthest from the first one and each half simplified
/// as a polyline. The result keeps at least three vertices.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 3 {
        return points.to_vec();
    }
    let Some(&origin) = points.first() else {
        return Vec::new();
    };

    let split = points
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.distance(origin).total_cmp(&b.1.distance(origin)))
        .map_or(points.len() / 2, |(index, _)| index);

    let mut closed = points.to_vec();
    closed.push(origin);
    let (Some(head), Some(tail)) = (closed.get(..=split), closed.get(split..)) else {
        return points.to_vec();
    };

    let mut result = simplify_polyline(head, tolerance);
    result.pop();
    result.extend(simplify_polyline(tail, tolerance));
    result.pop();

    if result.len() >= 3 {
        return result;
    }

    // Degenerate: keep the origin, the split vertex and the vertex farthest from that chord
    let far = closed.get(split).copied().unwrap_or(origin);
    let third = points
        .iter()
        .copied()
        .filter(|&p| p != origin && p != far)
        .max_by(|a, b| {
            segment_distance(*a, origin, far).total_cmp(&segment_distance(*b, origin, far))
        });
    third.map_or_else(|| points.to_vec(), |point| vec![origin, far, point])
}

/// Simplify the outline of a region in place
pub fn simplify_region(region: &mut Region, tolerance: f64) {
    region.points = simplify(&region.points, tolerance);
}
