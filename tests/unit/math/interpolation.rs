//! Tests for interpolation curves, windows and colour ramps

#[cfg(test)]
mod tests {
    use tilesmith::math::interpolation::{
        hann, lerp, lerp_rgba, quintic_fade, sample_ramp, smoothstep,
    };

    // Tests lerp reaches both endpoints and the midpoint
    // Verified by swapping a and b in the formula
    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert!((lerp(2.0f64, 6.0, 0.0) - 2.0).abs() < f64::EPSILON);
        assert!((lerp(2.0f64, 6.0, 1.0) - 6.0).abs() < f64::EPSILON);
        assert!((lerp(2.0f32, 6.0, 0.5) - 4.0).abs() < f32::EPSILON);
    }

    // Tests the quintic fade is pinned at 0, 0.5 and 1 and monotone between
    // Verified by replacing it with the cubic hermite curve
    #[test]
    fn test_quintic_fade_shape() {
        assert!(quintic_fade(0.0).abs() < f64::EPSILON);
        assert!((quintic_fade(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((quintic_fade(0.5) - 0.5).abs() < 1e-12);

        let mut previous = 0.0;
        for step in 1..=20 {
            let value = quintic_fade(f64::from(step) / 20.0);
            assert!(value >= previous);
            previous = value;
        }
        assert!(quintic_fade(0.1) < 0.1, "fade should start flatter than linear");
    }

    // Tests smoothstep clamps outside the edges and handles a degenerate range
    // Verified by removing the clamp
    #[test]
    fn test_smoothstep_clamps_and_degenerates_to_step() {
        assert!(smoothstep(0.0, 1.0, -3.0).abs() < f64::EPSILON);
        assert!((smoothstep(0.0, 1.0, 7.0) - 1.0).abs() < f64::EPSILON);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);

        assert!(smoothstep(2.0, 2.0, 1.0).abs() < f64::EPSILON);
        assert!((smoothstep(2.0, 2.0, 2.0) - 1.0).abs() < f64::EPSILON);
    }

    // Tests the Hann window is small at the ends, near one in the centre and symmetric
    // Verified by using cosine instead of sine
    #[test]
    fn test_hann_window_profile() {
        let length = 64;
        assert!(hann(0, length) < 0.01);
        assert!(hann(length - 1, length) < 0.01);
        assert!(hann(length / 2, length) > 0.99);
        for index in 0..length {
            let mirrored = hann(length - 1 - index, length);
            assert!((hann(index, length) - mirrored).abs() < 1e-12);
        }
        assert!(hann(0, 0).abs() < f64::EPSILON);
    }

    // Tests rgba blending rounds per channel and clamps t
    // Verified by truncating instead of rounding
    #[test]
    fn test_lerp_rgba_blends_channels() {
        let from = [0, 100, 200, 255];
        let to = [255, 101, 0, 255];
        assert_eq!(lerp_rgba(from, to, 0.0), from);
        assert_eq!(lerp_rgba(from, to, 1.0), to);
        assert_eq!(lerp_rgba(from, to, 0.5), [128, 101, 100, 255]);
        assert_eq!(lerp_rgba(from, to, 3.0), to);
    }

    // Tests ramp sampling hits stops exactly and interpolates between them
    // Verified by dropping the last-segment clamp
    #[test]
    fn test_sample_ramp_stops_and_segments() {
        let stops = [[0, 0, 0], [100, 100, 100], [200, 0, 0]];
        assert_eq!(sample_ramp(&stops, 0.0), [0, 0, 0, 255]);
        assert_eq!(sample_ramp(&stops, 0.5), [100, 100, 100, 255]);
        assert_eq!(sample_ramp(&stops, 1.0), [200, 0, 0, 255]);
        assert_eq!(sample_ramp(&stops, 0.25), [50, 50, 50, 255]);
        assert_eq!(sample_ramp(&stops, -1.0), [0, 0, 0, 255]);

        assert_eq!(sample_ramp(&[], 0.5), [0, 0, 0, 255]);
        assert_eq!(sample_ramp(&[[9, 8, 7]], 0.9), [9, 8, 7, 255]);
    }
}
