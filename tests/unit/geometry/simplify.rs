//! Tests for Douglas-Peucker outline simplification

#[cfg(test)]
mod tests {
    use tilesmith::geometry::regions::{Point, Region};
    use tilesmith::geometry::simplify::{
        segment_distance, simplify, simplify_polyline, simplify_region,
    };

    /// Outline of a 4×4 pixel block traced through its boundary pixel centres
    fn block_outline() -> Vec<Point> {
        let mut points = Vec::new();
        for x in 0..4 {
            points.push(Point::new(f64::from(x) + 0.5, 0.5));
        }
        for y in 1..4 {
            points.push(Point::new(3.5, f64::from(y) + 0.5));
        }
        for x in (0..3).rev() {
            points.push(Point::new(f64::from(x) + 0.5, 3.5));
        }
        for y in (1..3).rev() {
            points.push(Point::new(0.5, f64::from(y) + 0.5));
        }
        points
    }

    // Tests distance to a segment clamps to its endpoints
    // Verified by measuring against the infinite line
    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, 0.0);
        assert!((segment_distance(Point::new(2.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((segment_distance(Point::new(7.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((segment_distance(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    // Tests collinear interior points are dropped and endpoints kept
    // Verified by dropping the last point
    #[test]
    fn test_simplify_polyline_drops_collinear() {
        let line: Vec<Point> = (0..6).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let simplified = simplify_polyline(&line, 0.1);
        assert_eq!(simplified, vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);

        let bent = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(4.0, 0.0),
        ];
        assert_eq!(simplify_polyline(&bent, 0.5), bent);
    }

    // Tests a block outline reduces to its four corners
    // Verified by splitting the ring at its midpoint instead of the farthest vertex
    #[test]
    fn test_simplify_block_to_corners() {
        let corners = simplify(&block_outline(), 0.5);
        assert_eq!(
            corners,
            vec![
                Point::new(0.5, 0.5),
                Point::new(3.5, 0.5),
                Point::new(3.5, 3.5),
                Point::new(0.5, 3.5),
            ]
        );
    }

    // Tests short outlines stay unchanged and results keep three vertices
    // Verified by removing the degenerate fallback
    #[test]
    fn test_simplify_keeps_minimum_vertices() {
        let triangle = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(simplify(&triangle, 10.0), triangle);

        let coarse = simplify(&block_outline(), 100.0);
        assert!(coarse.len() >= 3, "got {} vertices", coarse.len());
    }

    // Tests region simplification replaces the outline in place
    // Verified by simplifying a copy
    #[test]
    fn test_simplify_region_in_place() {
        let mut region = Region {
            color_index: 2,
            points: block_outline(),
            area: 16,
        };
        simplify_region(&mut region, 0.5);
        assert_eq!(region.points.len(), 4);
        assert_eq!(region.area, 16);
    }
}
