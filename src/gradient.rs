//! Alpha gradients used as soft edge masks around text decorations.

use crate::composite;
use crate::pixels::{ALPHA, LUMINANCE, PixelBuffer};

/// Square luminance/alpha gradient image.
///
/// Side gradients fade from opaque at column 0 to clear at the last column.
/// Corner gradients fade with distance from pixel (0, 0). Rotate the result
/// with [`PixelBuffer::rotated_quarter`] to face other edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGradient {
    size: u32,
    corner: bool,
    falloff: f32,
}

impl Default for EdgeGradient {
    fn default() -> Self {
        Self {
            size: 64,
            corner: false,
            falloff: 1.0,
        }
    }
}

impl EdgeGradient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn with_corner(mut self, corner: bool) -> Self {
        self.corner = corner;
        self
    }

    /// Exponent applied to the linear ramp; above 1 fades faster.
    pub fn with_falloff(mut self, falloff: f32) -> Self {
        self.falloff = falloff.max(0.0);
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_corner(&self) -> bool {
        self.corner
    }

    fn alpha_at(&self, x: u32, y: u32) -> u8 {
        let extent = self.size.saturating_sub(1).max(1) as f32;
        let t = if self.corner {
            (x as f32).hypot(y as f32) / extent
        } else {
            x as f32 / extent
        };
        let ramp = (1.0 - t).clamp(0.0, 1.0).powf(self.falloff);
        (ramp * 255.0).round() as u8
    }

    pub fn create(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new_luminance_alpha(self.size, self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                let a = self.alpha_at(x, y);
                if let Some(p) = out.pixel_mut(x, y) {
                    p[LUMINANCE] = 255;
                    p[ALPHA] = a;
                }
            }
        }
        out
    }

    /// Gradient turned by `turns` quarter turns counter-clockwise.
    pub fn create_turned(&self, turns: u32) -> PixelBuffer {
        self.create().rotated_quarter(turns)
    }

    /// Composites the gradient over `dst` with its top-left at (x, y).
    pub fn composite_onto(&self, dst: &mut PixelBuffer, x: u32, y: u32) {
        composite::composite_over(dst, &self.create(), x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_ramp() {
        let g = EdgeGradient::new().with_size(5).create();
        let alphas: Vec<u8> = (0..5).map(|x| g.pixel(x, 2).unwrap()[ALPHA]).collect();
        assert_eq!(alphas, vec![255, 191, 128, 64, 0]);
        // constant down each column
        assert_eq!(g.pixel(1, 0), g.pixel(1, 4));
        assert_eq!(g.pixel(0, 0).unwrap()[LUMINANCE], 255);
    }

    #[test]
    fn test_corner_radial() {
        let g = EdgeGradient::new().with_size(5).with_corner(true).create();
        assert_eq!(g.pixel(0, 0).unwrap()[ALPHA], 255);
        assert_eq!(g.pixel(4, 0).unwrap()[ALPHA], 0);
        assert_eq!(g.pixel(0, 4).unwrap()[ALPHA], 0);
        assert_eq!(g.pixel(4, 4).unwrap()[ALPHA], 0);
        // symmetric about the diagonal
        assert_eq!(g.pixel(1, 2), g.pixel(2, 1));
        assert!(g.pixel(1, 1).unwrap()[ALPHA] < g.pixel(1, 0).unwrap()[ALPHA]);
    }

    #[test]
    fn test_falloff_steepens() {
        let linear = EdgeGradient::new().with_size(5).create();
        let steep = EdgeGradient::new().with_size(5).with_falloff(2.0).create();
        assert_eq!(steep.pixel(2, 0).unwrap()[ALPHA], 64);
        assert!(steep.pixel(2, 0).unwrap()[ALPHA] < linear.pixel(2, 0).unwrap()[ALPHA]);
    }

    #[test]
    fn test_turned_faces_other_edge() {
        let g = EdgeGradient::new().with_size(4);
        let turned = g.create_turned(2);
        assert_eq!(turned.pixel(3, 0).unwrap()[ALPHA], 255);
        assert_eq!(turned.pixel(0, 0).unwrap()[ALPHA], 0);
    }

    #[test]
    fn test_composite_onto() {
        let mut dst = PixelBuffer::new_luminance_alpha(8, 8);
        EdgeGradient::new().with_size(4).composite_onto(&mut dst, 2, 2);
        assert_eq!(dst.pixel(2, 2), Some(&[255u8, 255][..]));
        assert_eq!(dst.pixel(0, 0), Some(&[0u8, 0][..]));
        assert_eq!(dst.pixel(5, 5).unwrap()[ALPHA], 0);
    }

    #[test]
    fn test_corner_alpha_far_from_origin() {
        let g = EdgeGradient::new().with_size(100_000).with_corner(true);
        assert_eq!(g.alpha_at(0, 0), 255);
        assert_eq!(g.alpha_at(80_000, 80_000), 0);
        assert_eq!(g.alpha_at(99_999, 0), 0);
        assert!(g.alpha_at(30_000, 40_000) > 0);
    }
}
