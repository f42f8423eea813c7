//! Alpha compositing and blur passes over 8-bit coverage planes.
//!
//! All values are 0..=255. The "over" rule divides by 255 after every
//! multiply so results stay in byte range:
//!
//! ```text
//! a' = a_bg * (1 - a_fg) + a_fg
//! i' = i_bg * a_bg * (1 - a_fg) + i_fg * a_fg
//! ```

use crate::pixels::{ALPHA, LUMINANCE, PixelBuffer};

/// A (luminance, alpha) pair.
pub type LumaAlpha = [u8; 2];

/// Composites `fg` over `bg`.
pub fn over(bg: LumaAlpha, fg: LumaAlpha) -> LumaAlpha {
    let [bi, ba] = [bg[0] as u32, bg[1] as u32];
    let [fi, fa] = [fg[0] as u32, fg[1] as u32];
    let inv = 255 - fa;

    let a = ba * inv / 255 + fa;
    let i = (bi * ba / 255) * inv / 255 + fi * fa / 255;
    [i.min(255) as u8, a.min(255) as u8]
}

/// Kernel for a radial box blur: weight falls off linearly with Euclidean
/// distance and reaches zero just past `radius`.
fn radial_kernel(radius: u32) -> (Vec<f32>, f32) {
    let r = radius as i32;
    let side = (2 * r + 1) as usize;
    let mut kernel = Vec::with_capacity(side * side);
    for dy in -r..=r {
        for dx in -r..=r {
            let d = ((dx * dx + dy * dy) as f32).sqrt();
            kernel.push((radius as f32 + 1.0 - d).max(0.0));
        }
    }
    let sum = kernel.iter().sum();
    (kernel, sum)
}

/// Blurs a `width x height` plane. Samples outside the plane count as zero,
/// and every output is normalized by the full kernel sum.
pub fn blur(plane: &[u8], width: u32, height: u32, radius: u32) -> Vec<u8> {
    if radius == 0 {
        return plane.to_vec();
    }
    let (kernel, sum) = radial_kernel(radius);
    let r = radius as i64;
    let side = (2 * r + 1) as usize;
    let (w, h) = (width as i64, height as i64);
    let mut out = vec![0u8; plane.len()];

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for ky in 0..side {
                let sy = y + ky as i64 - r;
                if sy < 0 || sy >= h {
                    continue;
                }
                for kx in 0..side {
                    let sx = x + kx as i64 - r;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    let v = plane[(sy * w + sx) as usize];
                    if v != 0 {
                        acc += v as f32 * kernel[ky * side + kx];
                    }
                }
            }
            out[(y * w + x) as usize] = (acc / sum).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

fn shifted(plane: &[u8], width: u32, height: u32, x: u32, y: u32, dx: i32, dy: i32) -> u8 {
    let sx = x as i64 - dx as i64;
    let sy = y as i64 - dy as i64;
    if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
        return 0;
    }
    plane[(sy * width as i64 + sx) as usize]
}

/// Composites `coverage` shifted by (dx, dy) with intensity `intensity` over `dst`.
pub fn composite_shifted(dst: &mut PixelBuffer, coverage: &[u8], intensity: u8, dx: i32, dy: i32) {
    let (w, h) = (dst.width(), dst.height());
    for y in 0..h {
        for x in 0..w {
            let a = shifted(coverage, w, h, x, y, dx, dy);
            if a == 0 {
                continue;
            }
            if let Some(p) = dst.pixel_mut(x, y) {
                let out = over([p[LUMINANCE], p[ALPHA]], [intensity, a]);
                p[LUMINANCE] = out[0];
                p[ALPHA] = out[1];
            }
        }
    }
}

/// Dark border around every glyph: the coverage composited at every offset of
/// a `(2 * border + 1)` square, then the glyph itself in full intensity on top.
pub fn outline(coverage: &[u8], width: u32, height: u32, border: u32) -> PixelBuffer {
    let mut out = PixelBuffer::new_luminance_alpha(width, height);
    let b = border as i32;
    for dy in -b..=b {
        for dx in -b..=b {
            composite_shifted(&mut out, coverage, 0, dx, dy);
        }
    }
    composite_shifted(&mut out, coverage, 255, 0, 0);
    out
}

/// Dark copy offset down and right by `border`, glyph on top.
pub fn shadow(coverage: &[u8], width: u32, height: u32, border: u32) -> PixelBuffer {
    let mut out = PixelBuffer::new_luminance_alpha(width, height);
    let b = border as i32;
    composite_shifted(&mut out, coverage, 0, b, b);
    composite_shifted(&mut out, coverage, 255, 0, 0);
    out
}

/// Full-intensity glyphs with alpha taken straight from coverage.
pub fn plain(coverage: &[u8], width: u32, height: u32) -> PixelBuffer {
    let mut out = PixelBuffer::new_luminance_alpha(width, height);
    for (p, &a) in out.pixels_mut().zip(coverage) {
        p[LUMINANCE] = 255;
        p[ALPHA] = a;
    }
    out
}

/// Composites all of `src` over `dst` with its top-left at (x, y).
pub fn composite_over(dst: &mut PixelBuffer, src: &PixelBuffer, x: u32, y: u32) {
    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let Some(s) = src.pixel(sx, sy) else { continue };
            let fg = [s[LUMINANCE], s[ALPHA]];
            let (Some(dx), Some(dy)) = (x.checked_add(sx), y.checked_add(sy)) else {
                continue;
            };
            if let Some(d) = dst.pixel_mut(dx, dy) {
                let out = over([d[LUMINANCE], d[ALPHA]], fg);
                d[LUMINANCE] = out[0];
                d[ALPHA] = out[1];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_opaque_and_transparent() {
        assert_eq!(over([10, 200], [255, 255]), [255, 255]);
        assert_eq!(over([10, 200], [255, 0]), [7, 200]);
        assert_eq!(over([0, 0], [0, 128]), [0, 128]);
    }

    #[test]
    fn test_over_blends_alpha() {
        // 128 over 128: 128 * 127 / 255 + 128 = 63 + 128
        assert_eq!(over([0, 128], [255, 128])[1], 191);
    }

    #[test]
    fn test_blur_preserves_flat_interior() {
        let plane = vec![200u8; 9 * 9];
        let out = blur(&plane, 9, 9, 2);
        assert_eq!(out[4 * 9 + 4], 200);
        // corners lose the samples that fall outside
        assert!(out[0] < 200);
    }

    #[test]
    fn test_blur_spreads_point() {
        let mut plane = vec![0u8; 7 * 7];
        plane[3 * 7 + 3] = 255;
        let out = blur(&plane, 7, 7, 1);
        let center = out[3 * 7 + 3];
        let edge = out[3 * 7 + 4];
        let diagonal = out[2 * 7 + 4];
        assert!(center > edge);
        assert!(edge > diagonal);
        assert!(diagonal > 0);
        assert_eq!(out[0], 0);
    }

    #[test]
    fn test_blur_radius_zero_is_identity() {
        let plane = vec![1, 2, 3, 4];
        assert_eq!(blur(&plane, 2, 2, 0), plane);
    }

    #[test]
    fn test_outline_surrounds_glyph() {
        // single lit pixel in the middle of a 5x5 plane
        let mut cov = vec![0u8; 25];
        cov[12] = 255;
        let out = outline(&cov, 5, 5, 1);

        assert_eq!(out.pixel(2, 2), Some(&[255u8, 255][..]));
        // ring is opaque and dark
        assert_eq!(out.pixel(1, 1), Some(&[0u8, 255][..]));
        assert_eq!(out.pixel(3, 2), Some(&[0u8, 255][..]));
        // beyond the border nothing
        assert_eq!(out.pixel(0, 0), Some(&[0u8, 0][..]));
    }

    #[test]
    fn test_shadow_offsets_down_right() {
        let mut cov = vec![0u8; 25];
        cov[12] = 255;
        let out = shadow(&cov, 5, 5, 2);
        assert_eq!(out.pixel(2, 2), Some(&[255u8, 255][..]));
        assert_eq!(out.pixel(4, 4), Some(&[0u8, 255][..]));
        assert_eq!(out.pixel(0, 0), Some(&[0u8, 0][..]));
        assert_eq!(out.pixel(3, 3), Some(&[0u8, 0][..]));
    }

    #[test]
    fn test_plain_uses_coverage_as_alpha() {
        let out = plain(&[0, 90, 255], 3, 1);
        assert_eq!(out.data(), &[255, 0, 255, 90, 255, 255]);
    }
}
