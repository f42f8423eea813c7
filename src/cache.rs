use crate::atlas::{Atlas, AtlasOptions, GlyphStyle};
use crate::config;
use crate::error::FontError;
use crate::font::{AbGlyphSource, GlyphSource};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Every parameter that changes the pixels of an atlas.
///
/// Keys compare field by field; two paths naming the same file through
/// different spellings are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub font_file: String,
    pub font_directory: PathBuf,
    pub blur: u32,
    pub style: GlyphStyle,
    pub style_border: u32,
    pub resolution: u32,
}

impl Default for FontKey {
    fn default() -> Self {
        let defaults = config::defaults();
        Self {
            font_file: defaults.font_file.clone(),
            font_directory: defaults.font_directory.clone(),
            blur: 0,
            style: GlyphStyle::Plain,
            style_border: 0,
            resolution: defaults.resolution,
        }
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}pt ({:?}, blur {}, border {})",
            self.path().display(),
            self.resolution,
            self.style,
            self.blur,
            self.style_border
        )
    }
}

impl FontKey {
    pub fn new(font_file: impl Into<String>) -> Self {
        Self::default().with_font_file(font_file)
    }

    pub fn with_font_file(mut self, font_file: impl Into<String>) -> Self {
        self.font_file = font_file.into();
        self
    }

    pub fn with_font_directory(mut self, font_directory: impl Into<PathBuf>) -> Self {
        self.font_directory = font_directory.into();
        self
    }

    pub fn with_blur(mut self, blur: u32) -> Self {
        self.blur = blur;
        self
    }

    pub fn with_style(mut self, style: GlyphStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_style_border(mut self, style_border: u32) -> Self {
        self.style_border = style_border;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution.max(1);
        self
    }

    pub fn path(&self) -> PathBuf {
        self.font_directory.join(&self.font_file)
    }

    pub fn atlas_options(&self) -> AtlasOptions {
        AtlasOptions {
            style: self.style,
            blur: self.blur,
            style_border: self.style_border,
        }
    }

    /// Same rendering parameters with the default font file and directory.
    pub fn with_default_font(&self) -> Self {
        let defaults = config::defaults();
        self.clone()
            .with_font_file(defaults.font_file.clone())
            .with_font_directory(defaults.font_directory.clone())
    }
}

/// Builds each distinct atlas once and hands out shared references to it.
///
/// Owned by the application; layouts receive the `Arc<Atlas>` it returns.
pub struct AtlasCache<S: GlyphSource = AbGlyphSource> {
    source: S,
    atlases: HashMap<FontKey, Arc<Atlas>>,
    build_count: usize,
}

impl<S: GlyphSource + fmt::Debug> fmt::Debug for AtlasCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlasCache")
            .field("source", &self.source)
            .field("atlases", &self.atlases.len())
            .field("build_count", &self.build_count)
            .finish()
    }
}

impl Default for AtlasCache<AbGlyphSource> {
    fn default() -> Self {
        Self::new(AbGlyphSource::new())
    }
}

impl<S: GlyphSource> AtlasCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            atlases: HashMap::new(),
            build_count: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn get(&self, key: &FontKey) -> Option<Arc<Atlas>> {
        self.atlases.get(key).cloned()
    }

    /// Returns the atlas for `key`, building it on first request.
    ///
    /// When the font cannot be read or parsed, the default font with the
    /// same rendering parameters is tried once, and the result is cached under
    /// `key` as well. Only the font file and directory are substituted, so a
    /// key that already names the default font is not retried with
    /// `FontKey::default()`. Fails with [`FontError::Load`] if the fallback
    /// also fails, or if `key` already names the default font.
    pub fn get_or_build(&mut self, key: &FontKey) -> Result<Arc<Atlas>, FontError> {
        let err = match self.build(key) {
            Ok(atlas) => return Ok(atlas),
            Err(err) => err,
        };

        let fallback = key.with_default_font();
        if fallback == *key {
            log::error!("default font failed to load: {}", err);
            return Err(FontError::Load {
                key: key.clone(),
                source: Box::new(err),
            });
        }

        log::warn!("{}; falling back to {}", err, fallback.path().display());
        match self.build(&fallback) {
            Ok(atlas) => {
                self.atlases.insert(key.clone(), atlas.clone());
                Ok(atlas)
            }
            Err(fallback_err) => {
                log::error!("default font failed to load: {}", fallback_err);
                Err(FontError::Load {
                    key: key.clone(),
                    source: Box::new(fallback_err),
                })
            }
        }
    }

    fn build(&mut self, key: &FontKey) -> Result<Arc<Atlas>, FontError> {
        if let Some(atlas) = self.atlases.get(key) {
            return Ok(atlas.clone());
        }
        let glyphs = self.source.rasterize_font(&key.path(), key.resolution)?;
        let atlas = Arc::new(Atlas::build(&glyphs, key.atlas_options()));
        self.build_count += 1;
        log::debug!("atlas #{} built for {}", self.build_count, key);
        self.atlases.insert(key.clone(), atlas.clone());
        Ok(atlas)
    }

    /// Number of atlases actually built, not counting cache hits.
    pub fn build_count(&self) -> usize {
        self.build_count
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BoxGlyphSource;

    fn default_only() -> BoxGlyphSource {
        BoxGlyphSource::readable([FontKey::default().path()])
    }

    #[test]
    fn test_equal_keys_share_one_atlas() {
        let mut cache = AtlasCache::new(BoxGlyphSource::new());
        let a = cache.get_or_build(&FontKey::new("Serif.ttf")).unwrap();
        let b = cache.get_or_build(&FontKey::new("Serif.ttf")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.build_count(), 1);
        assert_eq!(cache.source().calls(), 1);
    }

    #[test]
    fn test_each_field_distinguishes_keys() {
        let mut cache = AtlasCache::new(BoxGlyphSource::new());
        let base = FontKey::new("Serif.ttf");
        let keys = [
            base.clone(),
            base.clone().with_blur(2),
            base.clone().with_style(GlyphStyle::Shadow),
            base.clone().with_style(GlyphStyle::Shadow).with_style_border(2),
            base.clone().with_resolution(32),
            base.clone().with_font_directory("/elsewhere"),
            base.clone().with_font_file("Sans.ttf"),
        ];
        for key in &keys {
            cache.get_or_build(key).unwrap();
        }
        for key in &keys {
            cache.get_or_build(key).unwrap();
        }
        assert_eq!(cache.build_count(), keys.len());
        assert_eq!(cache.len(), keys.len());
    }

    #[test]
    fn test_unreadable_font_falls_back_to_default() {
        let mut cache = AtlasCache::new(default_only());
        let key = FontKey::new("Missing.ttf").with_blur(1);

        let atlas = cache.get_or_build(&key).unwrap();
        let fallback = cache.get(&key.with_default_font()).unwrap();
        assert!(Arc::ptr_eq(&atlas, &fallback));
        assert_eq!(atlas.options().blur, 1);
        assert_eq!(cache.build_count(), 1);

        // the failed key is now served from the cache
        let again = cache.get_or_build(&key).unwrap();
        assert!(Arc::ptr_eq(&atlas, &again));
        assert_eq!(cache.source().calls(), 2);
    }

    #[test]
    fn test_default_font_failure_is_fatal() {
        let mut cache = AtlasCache::new(BoxGlyphSource::readable(Vec::<PathBuf>::new()));

        let err = cache.get_or_build(&FontKey::new("Missing.ttf")).unwrap_err();
        match err {
            FontError::Load { key, source } => {
                assert_eq!(key.font_file, "Missing.ttf");
                assert!(matches!(*source, FontError::NotFound { .. }));
            }
            other => panic!("expected load error, got {other:?}"),
        }
        assert!(cache.is_empty());
        assert_eq!(cache.build_count(), 0);

        let err = cache.get_or_build(&FontKey::default()).unwrap_err();
        assert!(matches!(err, FontError::Load { .. }));
    }

    #[test]
    fn test_malformed_font_falls_back_to_default() {
        let broken = FontKey::new("Broken.ttf").with_font_directory("/fonts");
        let source = BoxGlyphSource::new().with_malformed([broken.path()]);
        let mut cache = AtlasCache::new(source);

        let atlas = cache.get_or_build(&broken).unwrap();
        let fallback = cache.get(&broken.with_default_font()).unwrap();
        assert!(Arc::ptr_eq(&atlas, &fallback));
        assert_eq!(cache.build_count(), 1);
        assert_eq!(cache.source().calls(), 2);
    }

    #[test]
    fn test_malformed_default_font_is_fatal() {
        let default_path = FontKey::default().path();
        let source = BoxGlyphSource::new().with_malformed([default_path]);
        let mut cache = AtlasCache::new(source);

        let err = cache.get_or_build(&FontKey::default()).unwrap_err();
        match err {
            FontError::Load { source, .. } => {
                assert!(matches!(*source, FontError::Format { .. }));
            }
            other => panic!("expected load error, got {other:?}"),
        }

        // unreadable request, malformed default
        let source = BoxGlyphSource::readable([FontKey::default().path()])
            .with_malformed([FontKey::default().path()]);
        let mut cache = AtlasCache::new(source);
        let err = cache.get_or_build(&FontKey::new("Missing.ttf")).unwrap_err();
        match err {
            FontError::Load { key, source } => {
                assert_eq!(key.font_file, "Missing.ttf");
                assert!(matches!(*source, FontError::Format { .. }));
            }
            other => panic!("expected load error, got {other:?}"),
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_key_does_not_retry() {
        let mut cache = AtlasCache::new(BoxGlyphSource::readable(Vec::<PathBuf>::new()));
        assert!(cache.get_or_build(&FontKey::default()).is_err());
        assert_eq!(cache.source().calls(), 1);
    }

    #[test]
    fn test_key_display_names_path() {
        let key = FontKey::new("Serif.ttf")
            .with_font_directory("/fonts")
            .with_resolution(32);
        let shown = key.to_string();
        assert!(shown.starts_with("/fonts/Serif.ttf at 32pt"));
    }
}
