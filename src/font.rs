//! Font loading and glyph rasterization.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{Font as _, FontArc, Glyph, GlyphId, PxScale, ScaleFont as _};

use crate::error::FontError;
use crate::glyph::{GlyphMetrics, GlyphSet, KerningTable, supported_codes};

/// Rasterizes every supported character code of a font file.
pub trait GlyphSource {
    fn rasterize_font(&self, path: &Path, resolution: u32) -> Result<GlyphSet, FontError>;
}

/// [`GlyphSource`] backed by `ab_glyph`. Parsed fonts are kept per path so
/// several atlas variants of one file only read and parse it once.
#[derive(Default)]
pub struct AbGlyphSource {
    font_cache: RefCell<HashMap<PathBuf, FontArc>>,
}

impl std::fmt::Debug for AbGlyphSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbGlyphSource")
            .field("cached_fonts", &self.font_cache.borrow().len())
            .finish()
    }
}

impl AbGlyphSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn load_font(&self, path: &Path) -> Result<FontArc, FontError> {
        if let Some(font) = self.font_cache.borrow().get(path) {
            return Ok(font.clone());
        }
        let data = load_font_from_file(path)?;
        let font = FontArc::try_from_vec(data).map_err(|e| FontError::Format {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.font_cache
            .borrow_mut()
            .insert(path.to_path_buf(), font.clone());
        Ok(font)
    }
}

impl GlyphSource for AbGlyphSource {
    fn rasterize_font(&self, path: &Path, resolution: u32) -> Result<GlyphSet, FontError> {
        let font = self.load_font(path)?;
        Ok(rasterize_font_arc(&font, resolution))
    }
}

pub fn load_font_from_file(path: &Path) -> Result<Vec<u8>, FontError> {
    std::fs::read(path).map_err(|source| FontError::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Rasterizes an already parsed font. Codes map to `char` by Latin-1 value.
pub fn rasterize_font_arc(font: &FontArc, resolution: u32) -> GlyphSet {
    let px_size = resolution.max(1) as f32;
    let scale = PxScale::from(px_size);
    let scaled = font.as_scaled(scale);

    let ids: Vec<(u8, GlyphId)> = supported_codes()
        .map(|code| (code, scaled.glyph_id(char::from(code))))
        .collect();

    let glyphs = ids
        .iter()
        .map(|&(code, id)| {
            let advance = scaled.h_advance(id);
            let glyph = Glyph {
                id,
                scale,
                position: ab_glyph::point(0.0, 0.0),
            };
            match scaled.outline_glyph(glyph) {
                Some(outlined) => {
                    let bounds = outlined.px_bounds();
                    let width = (bounds.max.x - bounds.min.x).ceil().max(1.0) as u32;
                    let height = (bounds.max.y - bounds.min.y).ceil().max(1.0) as u32;
                    let mut bitmap = vec![0u8; (width * height) as usize];
                    outlined.draw(|x, y, v| {
                        if x < width && y < height {
                            let idx = (y * width + x) as usize;
                            bitmap[idx] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                        }
                    });
                    GlyphMetrics {
                        code,
                        width,
                        height,
                        advance,
                        top_bearing: -bounds.min.y.floor() as i32,
                        left_bearing: bounds.min.x.floor() as i32,
                        bitmap,
                    }
                }
                // Blank glyphs (space, nbsp) still get a 1x1 cell.
                None => GlyphMetrics {
                    code,
                    width: 1,
                    height: 1,
                    advance,
                    top_bearing: 1,
                    left_bearing: 0,
                    bitmap: vec![0],
                },
            }
        })
        .collect();

    let mut kerning = KerningTable::new();
    for &(left, left_id) in &ids {
        for &(right, right_id) in &ids {
            kerning.insert(left, right, scaled.kern(left_id, right_id));
        }
    }

    log::debug!(
        "rasterized {} glyphs at {}pt, {} kerning pairs",
        ids.len(),
        resolution,
        kerning.len()
    );

    GlyphSet {
        glyphs,
        kerning,
        resolution: resolution.max(1),
    }
}
