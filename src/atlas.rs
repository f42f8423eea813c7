//! Packs a font's glyph set into one two-channel texture image.

use ultraviolet::Vec2;

use crate::composite;
use crate::config::ATLAS_WIDTH;
use crate::glyph::{GlyphMetrics, GlyphSet, KerningTable, SPACE_CODE};
use crate::packer::{PackerRect, RowPacker};
use crate::pixels::PixelBuffer;

/// How glyph alpha is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphStyle {
    #[default]
    Plain,
    /// Dark border of `style_border` pixels on every side.
    Outline,
    /// Dark copy offset down and right by `style_border` pixels.
    Shadow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasOptions {
    pub style: GlyphStyle,
    /// Blur radius in pixels, 0 for none.
    pub blur: u32,
    /// Border size for outline and shadow styles.
    pub style_border: u32,
}

impl AtlasOptions {
    /// Empty pixels around each glyph bitmap inside its packed cell.
    pub fn gap(&self) -> u32 {
        let styled = match self.style {
            GlyphStyle::Plain => 0,
            GlyphStyle::Outline | GlyphStyle::Shadow => self.style_border,
        };
        self.blur.saturating_add(1).saturating_add(styled)
    }

    /// Pixels around the bitmap that blur or style may paint into. The UV
    /// rectangle and the emitted quad both include this margin.
    pub fn margin(&self) -> u32 {
        self.gap() - 1
    }
}

/// One glyph's metrics and its placement in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasGlyph {
    pub code: u8,
    pub width: u32,
    pub height: u32,
    pub advance: f32,
    pub top_bearing: i32,
    pub left_bearing: i32,
    /// Packed cell in atlas pixels, padding included.
    pub cell: PackerRect,
    /// Top-left of the sampled region, normalized.
    pub uv_origin: Vec2,
    /// Size of the sampled region, normalized.
    pub uv_size: Vec2,
}

impl AtlasGlyph {
    fn new(g: &GlyphMetrics, cell: PackerRect, uv: [f32; 4]) -> Self {
        Self {
            code: g.code,
            width: g.width,
            height: g.height,
            advance: g.advance,
            top_bearing: g.top_bearing,
            left_bearing: g.left_bearing,
            cell,
            uv_origin: Vec2::new(uv[0], uv[1]),
            uv_size: Vec2::new(uv[2], uv[3]),
        }
    }

    pub fn bottom_bearing(&self) -> i32 {
        self.top_bearing - self.height as i32
    }
}

/// Packed glyph texture plus the lookup tables layout needs.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Atlas {
    pixels: PixelBuffer,
    glyphs: Vec<Option<AtlasGlyph>>,
    kerning: KerningTable,
    scale: f32,
    options: AtlasOptions,
}

impl Atlas {
    pub fn build(set: &GlyphSet, options: AtlasOptions) -> Self {
        let gap = options.gap();
        let mut packer = RowPacker::new(ATLAS_WIDTH, gap);

        let placed: Vec<(&GlyphMetrics, PackerRect)> = set
            .glyphs
            .iter()
            .map(|g| (g, packer.insert_raw(g.width, g.height)))
            .collect();

        let width = packer.width();
        let height = packer.height();

        let mut coverage = PixelBuffer::new(width, height, 1);
        for (g, rect) in &placed {
            coverage.blit_channel(&g.bitmap, g.width, g.height, rect.x + gap, rect.y + gap, 0);
        }

        let mut coverage = coverage.into_data();
        if options.blur > 0 {
            coverage = composite::blur(&coverage, width, height, options.blur);
        }

        let pixels = match options.style {
            GlyphStyle::Plain => composite::plain(&coverage, width, height),
            GlyphStyle::Outline => {
                composite::outline(&coverage, width, height, options.style_border)
            }
            GlyphStyle::Shadow => {
                composite::shadow(&coverage, width, height, options.style_border)
            }
        };

        let mut glyphs = vec![None; 256];
        for (g, rect) in &placed {
            // Leave the outermost padding pixel unsampled so filtering never
            // reaches the neighbouring cell.
            let uv = packer.get_uv_param(rect, height, 1);
            glyphs[g.code as usize] = Some(AtlasGlyph::new(g, *rect, uv));
        }

        log::debug!(
            "built {}x{} atlas: {} glyphs, style {:?}, blur {}, gap {}",
            width,
            height,
            placed.len(),
            options.style,
            options.blur,
            gap
        );

        Self {
            pixels,
            glyphs,
            kerning: set.kerning.clone(),
            scale: 1.0 / set.resolution.max(1) as f32,
            options,
        }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Layout units per pixel (the inverse of the rasterizer resolution).
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn options(&self) -> AtlasOptions {
        self.options
    }

    /// See [`AtlasOptions::margin`].
    pub fn margin(&self) -> u32 {
        self.options.margin()
    }

    pub fn glyph(&self, code: u8) -> Option<&AtlasGlyph> {
        self.glyphs.get(code as usize).and_then(|g| g.as_ref())
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &AtlasGlyph> {
        self.glyphs.iter().flatten()
    }

    /// Kerning adjustment between two codes, in pixels.
    pub fn kern(&self, left: u8, right: u8) -> f32 {
        self.kerning.get(left, right)
    }

    /// Unkerned advance of the space glyph, in pixels.
    pub fn space_advance(&self) -> f32 {
        self.glyph(SPACE_CODE).map(|g| g.advance).unwrap_or(0.0)
    }

    /// Sum of scaled advances of every known character of `text`, plus one
    /// space when `trailing_space` is set. Kerning is not applied.
    pub fn advance_width(&self, text: &str, trailing_space: bool) -> f32 {
        let mut x = 0.0f32;
        for ch in text.chars() {
            let Ok(code) = u8::try_from(u32::from(ch)) else {
                continue;
            };
            if let Some(g) = self.glyph(code) {
                x += g.advance * self.scale;
            }
        }
        if trailing_space {
            x += self.space_advance() * self.scale;
        }
        x
    }
}
