//! Tests for CIELAB conversion and colour difference

#[cfg(test)]
mod tests {
    use image::Rgba;
    use tilesmith::math::color::{Lab, delta_e76, pixel_delta_e, srgb_to_lab};

    // Tests the achromatic endpoints land on the L axis
    // Verified by swapping the white point constants
    #[test]
    fn test_black_and_white_reference_points() {
        let black = srgb_to_lab([0, 0, 0]);
        assert!(black.l.abs() < 1e-6);

        let white = srgb_to_lab([255, 255, 255]);
        assert!((white.l - 100.0).abs() < 0.05, "white L = {}", white.l);
        assert!(white.a.abs() < 0.05);
        assert!(white.b.abs() < 0.05);
    }

    // Tests red has a strongly positive a channel and blue a negative b channel
    // Verified by exchanging the a and b formulas
    #[test]
    fn test_chromatic_axes_have_expected_signs() {
        let red = srgb_to_lab([255, 0, 0]);
        assert!(red.a > 60.0);

        let blue = srgb_to_lab([0, 0, 255]);
        assert!(blue.b < -60.0);
    }

    // Tests ΔE is zero for identical colours, symmetric and Euclidean
    // Verified by dropping the b term from the distance
    #[test]
    fn test_delta_e76_is_euclidean() {
        let a = Lab {
            l: 50.0,
            a: 0.0,
            b: 0.0,
        };
        let b = Lab {
            l: 53.0,
            a: 4.0,
            b: 0.0,
        };
        assert!(delta_e76(a, a).abs() < f64::EPSILON);
        assert!((delta_e76(a, b) - 5.0).abs() < 1e-12);
        assert!((delta_e76(a, b) - delta_e76(b, a)).abs() < f64::EPSILON);
    }

    // Tests pixel distance ignores alpha
    // Verified by including alpha in the conversion
    #[test]
    fn test_pixel_delta_e_ignores_alpha() {
        let opaque = Rgba([120, 80, 40, 255]);
        let transparent = Rgba([120, 80, 40, 0]);
        assert!(pixel_delta_e(opaque, transparent).abs() < f64::EPSILON);
        assert!(pixel_delta_e(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255])) > 99.0);
    }
}
