//! Transform kernel: mirror, rotate, scale, shift. Used directly by the
//! reference resolver to expand SREF/AREF instances.

use std::f64::consts::PI;

use crate::strans::Strans;

/// Round half away from zero to the nearest `i32`, for deterministic,
/// platform-independent rounding. `f64::round` already implements this
/// policy.
fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}

/// Apply the similarity transform to an interleaved `(x, y)` point list:
/// mirror about the x-axis (if `strans.reflect()`), rotate by
/// `angle_deg`, scale by `mag`, then translate by `(dx, dy)`.
pub fn transform_points(xy: &[i32], dx: i32, dy: i32, strans: Strans, mag: f64, angle_deg: f64) -> Vec<i32> {
    let radians = angle_deg * PI / 180.0;
    let (sin, cos) = radians.sin_cos();
    let mirror = if strans.reflect() { -1.0 } else { 1.0 };

    let mut out = Vec::with_capacity(xy.len());
    for pair in xy.chunks_exact(2) {
        let x = pair[0] as f64;
        let y = pair[1] as f64 * mirror;
        let rx = (x * cos - y * sin) * mag;
        let ry = (x * sin + y * cos) * mag;
        out.push(round_to_i32(rx + dx as f64));
        out.push(round_to_i32(ry + dy as f64));
    }
    out
}

/// Transform a single `(x, y)` point, as used for array-reference
/// instance origins.
pub fn transform_point(x: i32, y: i32, dx: i32, dy: i32, strans: Strans, mag: f64, angle_deg: f64) -> (i32, i32) {
    let transformed = transform_points(&[x, y], dx, dy, strans, mag, angle_deg);
    (transformed[0], transformed[1])
}

/// `round(width * mag)`. Absolute widths (negative) are unaffected by
/// magnification, so callers must check `width < 0` before calling this.
pub fn transform_width(width: i32, mag: f64) -> i32 {
    round_to_i32(width as f64 * mag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform() {
        let xy = vec![10, 20, -5, 7];
        let out = transform_points(&xy, 0, 0, Strans::default(), 1.0, 0.0);
        assert_eq!(out, xy);
    }

    #[test]
    fn rotation_inverse_round_trips() {
        let xy = vec![37, -41];
        let forward = transform_points(&xy, 0, 0, Strans::default(), 1.0, 33.0);
        let back = transform_points(&forward, 0, 0, Strans::default(), 1.0, -33.0);
        for (a, b) in xy.iter().zip(back.iter()) {
            assert!((a - b).abs() <= 1, "expected {a} ~= {b}");
        }
    }

    #[test]
    fn mirror_flips_y() {
        let xy = vec![5, 9];
        let strans = Strans::from_raw(1 << 15);
        let out = transform_points(&xy, 0, 0, strans, 1.0, 0.0);
        assert_eq!(out, vec![5, -9]);
    }

    #[test]
    fn translate_and_scale() {
        let xy = vec![2, 3];
        let out = transform_points(&xy, 100, -100, Strans::default(), 2.0, 0.0);
        assert_eq!(out, vec![104, -94]);
    }
}
