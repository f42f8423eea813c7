//! Rasterized glyph data handed from a [`GlyphSource`](crate::GlyphSource)
//! to the atlas builder.

use std::collections::HashMap;

/// Character code of the space glyph. Its advance drives whitespace.
pub const SPACE_CODE: u8 = b' ';

/// Returns true for codes that lay out as a visible glyph.
pub fn is_printable(code: u8) -> bool {
    matches!(code, 33..=126 | 160..=255)
}

/// Codes every glyph source rasterizes: the space plus all printable codes.
pub fn supported_codes() -> impl Iterator<Item = u8> {
    (SPACE_CODE..=u8::MAX).filter(|&c| c == SPACE_CODE || is_printable(c))
}

/// Metrics and coverage bitmap for one character code.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub code: u8,
    /// Bitmap width in pixels, at least 1.
    pub width: u32,
    /// Bitmap height in pixels, at least 1.
    pub height: u32,
    /// Horizontal pen advance in pixels.
    pub advance: f32,
    /// Pixels from the baseline up to the bitmap's top row.
    pub top_bearing: i32,
    /// Pixels from the pen position to the bitmap's left column.
    pub left_bearing: i32,
    /// Row-major luminance, `width * height` bytes.
    pub bitmap: Vec<u8>,
}

impl GlyphMetrics {
    /// Pixels from the baseline down to the bitmap's bottom row (negative for descenders).
    pub fn bottom_bearing(&self) -> i32 {
        self.top_bearing - self.height as i32
    }
}

/// Signed pixel adjustments between adjacent character codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KerningTable {
    pairs: HashMap<(u8, u8), f32>,
}

impl KerningTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an adjustment; zero adjustments are not stored.
    pub fn insert(&mut self, left: u8, right: u8, adjust: f32) {
        if adjust != 0.0 {
            self.pairs.insert((left, right), adjust);
        }
    }

    pub fn get(&self, left: u8, right: u8) -> f32 {
        self.pairs.get(&(left, right)).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Everything a glyph source produces for one font at one resolution.
#[derive(Debug, Clone)]
pub struct GlyphSet {
    pub glyphs: Vec<GlyphMetrics>,
    pub kerning: KerningTable,
    /// Points per layout unit; the atlas scale is its inverse.
    pub resolution: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_codes() {
        let codes: Vec<u8> = supported_codes().collect();
        assert_eq!(codes[0], b' ');
        assert!(codes.contains(&b'A'));
        assert!(codes.contains(&b'~'));
        assert!(codes.contains(&0xE9));
        assert!(!codes.contains(&127));
        assert!(!codes.contains(&0x85));
        assert_eq!(codes.len(), 1 + 94 + 96);
    }

    #[test]
    fn test_kerning_table_skips_zero() {
        let mut k = KerningTable::new();
        k.insert(b'A', b'V', -2.0);
        k.insert(b'A', b'B', 0.0);
        assert_eq!(k.len(), 1);
        assert_eq!(k.get(b'A', b'V'), -2.0);
        assert_eq!(k.get(b'V', b'A'), 0.0);
    }

    #[test]
    fn test_bottom_bearing() {
        let g = GlyphMetrics {
            code: b'g',
            width: 5,
            height: 9,
            advance: 6.0,
            top_bearing: 6,
            left_bearing: 0,
            bitmap: vec![0; 45],
        };
        assert_eq!(g.bottom_bearing(), -3);
    }
}
