//! Deterministic glyph source for unit tests; no font files needed.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::error::FontError;
use crate::font::GlyphSource;
use crate::glyph::{GlyphMetrics, GlyphSet, KerningTable, SPACE_CODE, supported_codes};

/// Box-shaped glyphs: width `4 + code % 3`, height 7 sitting on the
/// baseline (9 with a two pixel descender for `gjpqy`), advance `width + 2`.
/// The space is a blank 1x1 cell with advance 3.
pub(crate) fn box_glyph(code: u8) -> GlyphMetrics {
    if code == SPACE_CODE {
        return GlyphMetrics {
            code,
            width: 1,
            height: 1,
            advance: 3.0,
            top_bearing: 1,
            left_bearing: 0,
            bitmap: vec![0],
        };
    }
    let width = 4 + (code % 3) as u32;
    let height = if b"gjpqy".contains(&code) { 9 } else { 7 };
    let fill = if code == 0xA0 { 0 } else { 255 };
    GlyphMetrics {
        code,
        width,
        height,
        advance: (width + 2) as f32,
        top_bearing: 7,
        left_bearing: 1,
        bitmap: vec![fill; (width * height) as usize],
    }
}

pub(crate) fn box_glyph_set(resolution: u32) -> GlyphSet {
    let mut kerning = KerningTable::new();
    kerning.insert(b'H', b'i', -1.0);
    kerning.insert(b'A', b'V', -2.0);
    kerning.insert(b'V', b'A', -2.0);
    GlyphSet {
        glyphs: supported_codes().map(box_glyph).collect(),
        kerning,
        resolution,
    }
}

/// [`GlyphSource`] producing [`box_glyph_set`]. Counts calls, can be
/// restricted to a list of readable paths, and can report some paths as
/// unparseable.
#[derive(Debug, Default)]
pub(crate) struct BoxGlyphSource {
    readable: Option<Vec<PathBuf>>,
    malformed: Vec<PathBuf>,
    calls: Cell<usize>,
}

impl BoxGlyphSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn readable<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            readable: Some(paths.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Paths that read fine but fail to parse.
    pub(crate) fn with_malformed<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.malformed.extend(paths.into_iter().map(Into::into));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl GlyphSource for BoxGlyphSource {
    fn rasterize_font(&self, path: &Path, resolution: u32) -> Result<GlyphSet, FontError> {
        self.calls.set(self.calls.get() + 1);
        if self.malformed.iter().any(|p| p == path) {
            return Err(FontError::Format {
                path: path.to_path_buf(),
                reason: "InvalidFont".to_string(),
            });
        }
        if let Some(readable) = &self.readable {
            if !readable.iter().any(|p| p == path) {
                return Err(FontError::NotFound {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such font"),
                });
            }
        }
        Ok(box_glyph_set(resolution))
    }
}
