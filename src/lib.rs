//! Glyph atlas text engine.
//!
//! A font is rasterized once into a single two-channel (luminance, alpha)
//! texture. Strings are then laid out against that atlas as textured quads,
//! with word wrap, multi-column overflow, alignment modes, kerning and
//! blurred, outlined or shadowed glyphs.
//!
//! # Example
//! ```no_run
//! use atlas_text::{Alignment, AtlasCache, FontKey, LayoutConfig, TextBlock};
//!
//! let mut cache = AtlasCache::default();
//! let atlas = cache.get_or_build(&FontKey::new("DejaVuSans.ttf").with_blur(1))?;
//!
//! let config = LayoutConfig::default()
//!     .with_box(12.0, 4.0)
//!     .with_wrapped(true)
//!     .with_alignment(Alignment::Justified);
//! let mut block = TextBlock::new("Glyph atlas text, wrapped and justified.", atlas)
//!     .with_config(config);
//!
//! let geometry = block.geometry();
//! let vertices = geometry.vertices();
//! let indices = geometry.indices();
//! # let _ = (vertices, indices);
//! # Ok::<(), atlas_text::FontError>(())
//! ```

mod atlas;
mod cache;
mod composite;
pub mod config;
mod error;
mod font;
mod geometry;
mod glyph;
mod gradient;
mod layout;
mod packer;
mod pixels;
mod text;
#[cfg(feature = "gpu")]
mod texture;

#[cfg(test)]
mod testing;

pub use atlas::{Atlas, AtlasGlyph, AtlasOptions, GlyphStyle};
pub use cache::{AtlasCache, FontKey};
pub use composite::{LumaAlpha, over};
pub use error::{Diagnostic, FontError};
pub use font::{AbGlyphSource, GlyphSource, load_font_from_file, rasterize_font_arc};
pub use geometry::{Geometry, GlyphVertex, TEXT_NORMAL, emit};
pub use glyph::{GlyphMetrics, GlyphSet, KerningTable, SPACE_CODE, is_printable, supported_codes};
pub use gradient::EdgeGradient;
pub use layout::{GlyphQuad, LayoutOutput, layout, layout_run};
pub use packer::{PackerRect, RowPacker};
pub use pixels::{ALPHA, LUMINANCE, PixelBuffer};
pub use text::{Alignment, BaselineWarp, CharacterRun, LayoutConfig, TextBlock, Token};
#[cfg(feature = "gpu")]
pub use texture::{AtlasTexture, format_for_channels};
