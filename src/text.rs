use crate::atlas::Atlas;
use crate::error::Diagnostic;
use crate::geometry::{self, Geometry};
use crate::glyph::is_printable;
use crate::layout::{LayoutOutput, layout_run};
use std::fmt;
use std::sync::Arc;
use ultraviolet::Vec3;

/// One laid-out unit of a [`CharacterRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A visible character code.
    Glyph(u8),
    Space,
    /// Advances like a space; there are no tab stops.
    Tab,
    LineBreak,
}

impl Token {
    /// Character code used as the right-hand side of a kerning pair.
    pub(crate) fn kerning_code(&self) -> Option<u8> {
        match self {
            Token::Glyph(c) => Some(*c),
            Token::Space | Token::Tab => Some(crate::glyph::SPACE_CODE),
            Token::LineBreak => None,
        }
    }
}

/// Text split into tokens. Unsupported characters are dropped and reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterRun {
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl CharacterRun {
    /// Tokenizes `text`. `"\r\n"` counts as a single line break.
    pub fn parse(text: &str) -> Self {
        let mut tokens = Vec::with_capacity(text.len());
        let mut diagnostics = Vec::new();
        let mut prev_cr = false;

        for (index, ch) in text.chars().enumerate() {
            let was_cr = std::mem::replace(&mut prev_cr, ch == '\r');
            let token = match ch {
                '\n' if was_cr => continue,
                '\n' | '\r' => Token::LineBreak,
                ' ' => Token::Space,
                '\t' => Token::Tab,
                _ => match u8::try_from(u32::from(ch)) {
                    Ok(code) if is_printable(code) => Token::Glyph(code),
                    _ => {
                        let d = Diagnostic::UnsupportedCharacter {
                            code: u32::from(ch),
                            index,
                        };
                        log::warn!("{}", d);
                        diagnostics.push(d);
                        continue;
                    }
                },
            };
            tokens.push(token);
        }

        Self {
            tokens,
            diagnostics,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of glyph tokens, which is also the number of quads laid out.
    pub fn visible_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, Token::Glyph(_)))
            .count()
    }
}

/// Horizontal placement of each line inside the layout box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    FlushLeft,
    FlushRight,
    /// Stretches inter-word gaps to fill the box. Needs wrapped text.
    Justified,
    Centered,
    /// Every character and space advances one unit.
    Monospace,
}

impl TryFrom<i32> for Alignment {
    type Error = Diagnostic;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Alignment::FlushLeft),
            1 => Ok(Alignment::FlushRight),
            2 => Ok(Alignment::Justified),
            3 => Ok(Alignment::Centered),
            4 => Ok(Alignment::Monospace),
            other => Err(Diagnostic::InvalidAlignment(other)),
        }
    }
}

/// Per-vertex transform applied after layout, e.g. to bend the baseline.
#[derive(Clone)]
pub struct BaselineWarp(Arc<dyn Fn(Vec3) -> Vec3 + Send + Sync>);

impl BaselineWarp {
    pub fn new(f: impl Fn(Vec3) -> Vec3 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        (self.0)(v)
    }
}

impl fmt::Debug for BaselineWarp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BaselineWarp(..)")
    }
}

/// Text-flow parameters. Lengths are layout units (one unit per
/// rasterizer resolution in points).
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub box_width: f32,
    pub box_height: f32,
    pub wrapped: bool,
    pub alignment: Alignment,
    /// Vertical distance between baselines.
    pub leading: f32,
    /// Extra start offset on the first line of each paragraph.
    pub indent: f32,
    /// Added to every advance.
    pub character_spacing: f32,
    pub baseline_warp: Option<BaselineWarp>,
    /// Translation applied to every vertex last.
    pub position_offset: Vec3,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_width: 10.0,
            box_height: 10.0,
            wrapped: false,
            alignment: Alignment::FlushLeft,
            leading: 1.0,
            indent: 0.0,
            character_spacing: 0.0,
            baseline_warp: None,
            position_offset: Vec3::zero(),
        }
    }
}

impl LayoutConfig {
    pub fn with_box(mut self, width: f32, height: f32) -> Self {
        self.box_width = width;
        self.box_height = height;
        self
    }

    pub fn with_wrapped(mut self, wrapped: bool) -> Self {
        self.wrapped = wrapped;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_character_spacing(mut self, spacing: f32) -> Self {
        self.character_spacing = spacing;
        self
    }

    pub fn with_baseline_warp(mut self, f: impl Fn(Vec3) -> Vec3 + Send + Sync + 'static) -> Self {
        self.baseline_warp = Some(BaselineWarp::new(f));
        self
    }

    pub fn with_position_offset(mut self, offset: Vec3) -> Self {
        self.position_offset = offset;
        self
    }
}

/// A string bound to an atlas and a layout configuration.
///
/// Layout runs lazily on [`TextBlock::layout`] and is kept until the text,
/// atlas or any configuration field changes; then it is rebuilt from scratch.
#[derive(Debug, Clone)]
pub struct TextBlock {
    text: String,
    run: CharacterRun,
    atlas: Arc<Atlas>,
    config: LayoutConfig,
    alignment_diagnostic: Option<Diagnostic>,
    output: Option<LayoutOutput>,
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TextBlock {
    pub fn new(text: impl Into<String>, atlas: Arc<Atlas>) -> Self {
        let text = text.into();
        Self {
            run: CharacterRun::parse(&text),
            text,
            atlas,
            config: LayoutConfig::default(),
            alignment_diagnostic: None,
            output: None,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text and re-tokenizes it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.run = CharacterRun::parse(&self.text);
        self.output = None;
    }

    pub fn run(&self) -> &CharacterRun {
        &self.run
    }

    pub fn atlas(&self) -> &Arc<Atlas> {
        &self.atlas
    }

    pub fn set_atlas(&mut self, atlas: Arc<Atlas>) {
        self.atlas = atlas;
        self.output = None;
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Mutable access to the configuration. Drops the current layout and
    /// any pending alignment diagnostic, since the alignment may change.
    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        self.alignment_diagnostic = None;
        self.output = None;
        &mut self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.alignment_diagnostic = None;
        self.output = None;
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.config_mut().alignment = alignment;
    }

    /// Sets the alignment from its numeric value. Unknown values select
    /// flush-left and are reported once, in the next layout's diagnostics.
    pub fn set_alignment_raw(&mut self, value: i32) {
        match Alignment::try_from(value) {
            Ok(alignment) => self.set_alignment(alignment),
            Err(d) => {
                log::warn!("{}", d);
                self.config_mut().alignment = Alignment::FlushLeft;
                self.alignment_diagnostic = Some(d);
            }
        }
    }

    pub fn set_position_offset(&mut self, offset: Vec3) {
        self.config.position_offset = offset;
        self.output = None;
    }

    /// Adds `delta` to the current position offset.
    pub fn add_position_offset(&mut self, delta: Vec3) {
        self.config.position_offset += delta;
        self.output = None;
    }

    /// True when the next [`TextBlock::layout`] call will recompute.
    pub fn is_dirty(&self) -> bool {
        self.output.is_none()
    }

    pub fn layout(&mut self) -> &LayoutOutput {
        let (run, atlas, config) = (&self.run, &self.atlas, &self.config);
        let alignment_diagnostic = &mut self.alignment_diagnostic;
        self.output.get_or_insert_with(|| {
            let mut out = layout_run(run, atlas, config);
            if let Some(d) = alignment_diagnostic.take() {
                out.diagnostics.insert(0, d);
            }
            out
        })
    }

    pub fn geometry(&mut self) -> Geometry {
        geometry::emit(self.layout())
    }
}
