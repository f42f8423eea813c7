//! Line breaking, alignment and quad placement.
//!
//! Layout is a pure function of the token run, the atlas and the
//! configuration. It runs in two passes: lines are broken first so that
//! right, centered and justified alignment know each line's width before the
//! pen walks it.

use ultraviolet::{Vec2, Vec3};

use crate::atlas::Atlas;
use crate::error::Diagnostic;
use crate::text::{Alignment, CharacterRun, LayoutConfig, Token};

/// One visible character: four corners and their atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub code: u8,
    /// Index of the glyph's token in the run.
    pub token_index: usize,
    /// Bottom-left, bottom-right, top-right, top-left.
    pub positions: [Vec3; 4],
    /// Matches `positions` corner for corner; v grows downwards.
    pub uvs: [Vec2; 4],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOutput {
    pub quads: Vec<GlyphQuad>,
    /// Pen position at every token, before baseline warp and offset.
    pub pen_positions: Vec<Vec3>,
    pub diagnostics: Vec<Diagnostic>,
    token_lines: Vec<usize>,
    line_count: usize,
    column_count: usize,
}

impl LayoutOutput {
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Line holding the token at `token_index`.
    pub fn line_of(&self, token_index: usize) -> Option<usize> {
        self.token_lines.get(token_index).copied()
    }

    /// Min and max corners over every quad vertex.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.quads.is_empty() {
            return None;
        }
        self.range_bounds(0, self.quads.len() - 1)
    }

    /// Min and max corners over quads `first..=last`. `last` is clamped to
    /// the final quad.
    pub fn range_bounds(&self, first: usize, last: usize) -> Option<(Vec3, Vec3)> {
        let last = last.min(self.quads.len().checked_sub(1)?);
        if first > last {
            return None;
        }
        let mut points = self.quads[first..=last]
            .iter()
            .flat_map(|q| q.positions.iter().copied());
        let start = points.next()?;
        Some(points.fold((start, start), |(lo, hi), p| {
            (lo.min_by_component(p), hi.max_by_component(p))
        }))
    }
}

/// Tokenizes `text` and lays it out.
pub fn layout(text: &str, atlas: &Atlas, config: &LayoutConfig) -> LayoutOutput {
    layout_run(&CharacterRun::parse(text), atlas, config)
}

pub fn layout_run(run: &CharacterRun, atlas: &Atlas, config: &LayoutConfig) -> LayoutOutput {
    let mut out = LayoutOutput {
        diagnostics: run.diagnostics().to_vec(),
        ..Default::default()
    };
    let tokens = run.tokens();
    if tokens.is_empty() {
        return out;
    }

    let alignment = match config.alignment {
        Alignment::Justified if !config.wrapped => {
            let d = Diagnostic::DegenerateLayout;
            log::warn!("{}", d);
            out.diagnostics.push(d);
            Alignment::FlushLeft
        }
        a => a,
    };
    let indent = match alignment {
        Alignment::FlushRight | Alignment::Centered => 0.0,
        Alignment::FlushLeft | Alignment::Justified | Alignment::Monospace => config.indent,
    };

    let advances = token_advances(tokens, atlas, config.character_spacing, alignment);
    let lines = break_lines(tokens, &advances, config, indent);

    out.pen_positions = vec![Vec3::zero(); tokens.len()];
    out.token_lines = vec![0; tokens.len()];

    let mut column = 0usize;
    let mut pen_y = 0.0f32;
    for (n, line) in lines.iter().enumerate() {
        if n > 0 {
            pen_y -= config.leading;
            if config.wrapped && -pen_y > config.box_height {
                column += 1;
                pen_y = 0.0;
            }
        }

        let gap = line.justified_gap(config.box_width);
        let mut pen_x = line.start_x(alignment, config.box_width)
            + column as f32 * (config.box_width + 1.0);

        for t in line.start..line.end {
            let pen = Vec3::new(pen_x, pen_y, 0.0);
            out.pen_positions[t] = pen;
            out.token_lines[t] = n;

            match tokens[t] {
                Token::Glyph(code) => {
                    match glyph_quad(atlas, code, t, pen) {
                        Some(quad) => out.quads.push(quad),
                        None => {
                            let d = Diagnostic::MissingGlyph(code);
                            if !out.diagnostics.contains(&d) {
                                log::warn!("{}", d);
                                out.diagnostics.push(d);
                            }
                        }
                    }
                    pen_x += advances[t];
                }
                Token::Space | Token::Tab if alignment == Alignment::Justified => {
                    // a run of whitespace is one gap
                    if t > line.start && matches!(tokens[t - 1], Token::Glyph(_)) {
                        pen_x += gap;
                    }
                }
                Token::Space | Token::Tab => pen_x += advances[t],
                Token::LineBreak => {}
            }
        }
    }

    out.line_count = lines.len();
    out.column_count = column + 1;

    for quad in &mut out.quads {
        for p in &mut quad.positions {
            if let Some(warp) = &config.baseline_warp {
                *p = warp.apply(*p);
            }
            *p += config.position_offset;
        }
    }

    out
}

/// Pen advance after each token, in layout units.
fn token_advances(tokens: &[Token], atlas: &Atlas, spacing: f32, alignment: Alignment) -> Vec<f32> {
    let scale = atlas.scale();
    let space = atlas.space_advance() * scale;
    let monospace = alignment == Alignment::Monospace;

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| match *token {
            Token::LineBreak => 0.0,
            Token::Glyph(code) => {
                let Some(g) = atlas.glyph(code) else {
                    return 0.0;
                };
                if monospace {
                    return 1.0 + spacing;
                }
                let kern = tokens
                    .get(i + 1)
                    .and_then(Token::kerning_code)
                    .map_or(0.0, |next| atlas.kern(code, next));
                (g.advance + kern) * scale + spacing
            }
            Token::Space | Token::Tab if monospace => 1.0 + spacing,
            Token::Space | Token::Tab => space + spacing,
        })
        .collect()
}

/// Token range `start..end` placed on one line. `end` includes a
/// terminating line break and any whitespace left over at a wrap point.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Line {
    start: usize,
    end: usize,
    indent: f32,
    words: usize,
    /// Summed advances of the words alone.
    glyph_width: f32,
    /// Advances from the first token through the last word.
    content_width: f32,
}

impl Line {
    fn new(start: usize, indent: f32) -> Self {
        Self {
            start,
            end: start,
            indent,
            words: 0,
            glyph_width: 0.0,
            content_width: 0.0,
        }
    }

    fn start_x(&self, alignment: Alignment, box_width: f32) -> f32 {
        match alignment {
            Alignment::FlushLeft | Alignment::Monospace | Alignment::Justified => self.indent,
            Alignment::FlushRight => box_width - self.content_width,
            Alignment::Centered => box_width / 2.0 - self.content_width / 2.0,
        }
    }

    fn justified_gap(&self, box_width: f32) -> f32 {
        if self.words > 1 {
            (box_width - self.indent - self.glyph_width) / (self.words - 1) as f32
        } else {
            0.0
        }
    }
}

/// Greedy word-granular line breaking. A word that does not fit starts a new
/// line; a word wider than the box still gets a line of its own.
fn break_lines(
    tokens: &[Token],
    advances: &[f32],
    config: &LayoutConfig,
    indent: f32,
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::new(0, indent);
    let mut width = indent;
    let mut pending = 0.0f32;
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::LineBreak => {
                line.end = i + 1;
                lines.push(line);
                line = Line::new(i + 1, indent);
                width = indent;
                pending = 0.0;
                i += 1;
            }
            Token::Space | Token::Tab => {
                pending += advances[i];
                i += 1;
            }
            Token::Glyph(_) => {
                let end = tokens[i..]
                    .iter()
                    .position(|t| !matches!(t, Token::Glyph(_)))
                    .map_or(tokens.len(), |n| i + n);
                let word: f32 = advances[i..end].iter().sum();

                if config.wrapped && line.words > 0 && width + pending + word > config.box_width {
                    line.end = i;
                    lines.push(line);
                    line = Line::new(i, 0.0);
                    width = 0.0;
                    pending = 0.0;
                }

                width += pending + word;
                pending = 0.0;
                line.words += 1;
                line.glyph_width += word;
                line.content_width = width - line.indent;
                i = end;
            }
        }
    }

    line.end = tokens.len();
    lines.push(line);
    lines
}

fn glyph_quad(atlas: &Atlas, code: u8, token_index: usize, pen: Vec3) -> Option<GlyphQuad> {
    let g = atlas.glyph(code)?;
    let s = atlas.scale();
    let m = atlas.margin() as f32;

    let x0 = pen.x + (g.left_bearing as f32 - m) * s;
    let y0 = pen.y + (g.bottom_bearing() as f32 - m) * s;
    let w = (g.width as f32 + 2.0 * m) * s;
    let h = (g.height as f32 + 2.0 * m) * s;

    let Vec2 { x: u, y: v } = g.uv_origin;
    let Vec2 { x: uw, y: vh } = g.uv_size;

    Some(GlyphQuad {
        code,
        token_index,
        positions: [
            Vec3::new(x0, y0, pen.z),
            Vec3::new(x0 + w, y0, pen.z),
            Vec3::new(x0 + w, y0 + h, pen.z),
            Vec3::new(x0, y0 + h, pen.z),
        ],
        uvs: [
            Vec2::new(u, v + vh),
            Vec2::new(u + uw, v + vh),
            Vec2::new(u + uw, v),
            Vec2::new(u, v),
        ],
    })
}
