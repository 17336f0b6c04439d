//! Interpolation curves and window functions shared by the synthesizers

use num_traits::Float;
use std::f64::consts::PI;

/// Linear interpolation between `a` and `b`
pub fn lerp<T: Float>(a: T, b: T, t: T) -> T {
    (b - a).mul_add(t, a)
}

/// Quintic fade curve with zero first and second derivatives at 0 and 1
///
/// Built only from multiplications and additions so results are bit-identical
/// on every platform.
pub fn quintic_fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * 2.0f64.mul_add(-t, 3.0)
}

/// Hann window weight for sample `index` of `length`
///
/// Close to zero at both ends and one in the centre.
pub fn hann(index: u32, length: u32) -> f64 {
    if length == 0 {
        return 0.0;
    }
    let phase = PI * (f64::from(index) + 0.5) / f64::from(length);
    let s = phase.sin();
    s * s
}

/// Blend two RGBA colours channel by channel
pub fn lerp_rgba(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for (channel, slot) in out.iter_mut().enumerate() {
        let from = f64::from(a.get(channel).copied().unwrap_or(0));
        let to = f64::from(b.get(channel).copied().unwrap_or(0));
        *slot = lerp(from, to, t).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Piecewise-linear colour ramp through evenly spaced stops
///
/// `t` is clamped into [0, 1]; an empty ramp yields opaque black.
pub fn sample_ramp(stops: &[[u8; 3]], t: f64) -> [u8; 4] {
    let Some(first) = stops.first() else {
        return [0, 0, 0, 255];
    };
    if stops.len() == 1 {
        return [first[0], first[1], first[2], 255];
    }

    let segments = (stops.len() - 1) as f64;
    let position = t.clamp(0.0, 1.0) * segments;
    let index = (position.floor() as usize).min(stops.len() - 2);
    let local = position - index as f64;

    let from = stops.get(index).copied().unwrap_or(*first);
    let to = stops.get(index + 1).copied().unwrap_or(from);
    lerp_rgba(
        [from[0], from[1], from[2], 255],
        [to[0], to[1], to[2], 255],
        local,
    )
}
