//! Error and diagnostic types.
//!
//! [`FontError`] is a hard failure: no atlas can be produced. [`Diagnostic`]
//! covers conditions the engine recovers from by degrading to a default; they
//! are logged and handed back alongside the result.

use std::path::PathBuf;

use crate::cache::FontKey;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The font path could not be read.
    #[error("font file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but the rasterizer could not parse it.
    #[error("unsupported font format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Neither the requested font nor the default font could be loaded.
    #[error("failed to load font for {key}")]
    Load {
        key: FontKey,
        #[source]
        source: Box<FontError>,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("unsupported character U+{code:04X} at index {index}, skipped")]
    UnsupportedCharacter { code: u32, index: usize },

    #[error("{0} is not a valid alignment, using flush-left")]
    InvalidAlignment(i32),

    #[error("justified alignment requires wrapped text, using flush-left")]
    DegenerateLayout,

    #[error("atlas has no glyph for character code {0}, skipped")]
    MissingGlyph(u8),
}
