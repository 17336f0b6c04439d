//! sRGB to CIELAB conversion and perceptual colour distance

use image::Rgba;

/// Colour in CIELAB space (D65 white point)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    /// Lightness, 0 to 100
    pub l: f64,
    /// Green to red axis
    pub a: f64,
    /// Blue to yellow axis
    pub b: f64,
}

const WHITE_X: f64 = 0.950_47;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088_83;

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008_856 {
        t.cbrt()
    } else {
        7.787f64.mul_add(t, 16.0 / 116.0)
    }
}

/// Convert an sRGB triple to CIELAB
pub fn srgb_to_lab(rgb: [u8; 3]) -> Lab {
    let r = linearize(rgb[0]);
    let g = linearize(rgb[1]);
    let b = linearize(rgb[2]);

    let x = 0.180_5f64.mul_add(b, 0.412_4f64.mul_add(r, 0.357_6 * g));
    let y = 0.072_2f64.mul_add(b, 0.212_6f64.mul_add(r, 0.715_2 * g));
    let z = 0.950_5f64.mul_add(b, 0.019_3f64.mul_add(r, 0.119_2 * g));

    let fx = lab_f(x / WHITE_X);
    let fy = lab_f(y / WHITE_Y);
    let fz = lab_f(z / WHITE_Z);

    Lab {
        l: 116.0f64.mul_add(fy, -16.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// CIE76 colour difference between two Lab colours
pub fn delta_e76(first: Lab, second: Lab) -> f64 {
    let dl = first.l - second.l;
    let da = first.a - second.a;
    let db = first.b - second.b;
    db.mul_add(db, dl.mul_add(dl, da * da)).sqrt()
}

/// Perceptual distance between two pixels, ignoring alpha
pub fn pixel_delta_e(first: Rgba<u8>, second: Rgba<u8>) -> f64 {
    let [r1, g1, b1, _] = first.0;
    let [r2, g2, b2, _] = second.0;
    delta_e76(srgb_to_lab([r1, g1, b1]), srgb_to_lab([r2, g2, b2]))
}
