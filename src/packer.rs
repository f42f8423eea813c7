/// Rectangle allocated by the packer, padding included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackerRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PackerRect {
    pub fn overlaps(&self, other: &PackerRect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Row packer: fills rows left to right up to a fixed width, then opens a new
/// row below the tallest cell of the previous one.
///
/// Every cell gets `padding` pixels on each side. A sprite wider than the row
/// is still placed at the start of its own row and simply overhangs.
#[derive(Debug, Clone)]
pub struct RowPacker {
    width: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_h: u32,
}

impl RowPacker {
    pub fn new(width: u32, padding: u32) -> Self {
        Self {
            width,
            padding,
            cursor_x: 0,
            cursor_y: 0,
            row_h: 0,
        }
    }

    /// Places a sprite of the given raw size. Always succeeds.
    pub fn insert_raw(&mut self, sprite_w: u32, sprite_h: u32) -> PackerRect {
        let border = self.padding.saturating_mul(2);
        let needed_w = sprite_w.saturating_add(border);
        let needed_h = sprite_h.saturating_add(border);

        if self.cursor_x > 0 && self.cursor_x.saturating_add(needed_w) > self.width {
            self.cursor_y = self.cursor_y.saturating_add(self.row_h);
            self.cursor_x = 0;
            self.row_h = 0;
        }
        if needed_w > self.width {
            log::warn!(
                "sprite of width {} exceeds atlas row width {}",
                needed_w,
                self.width
            );
        }

        let rect = PackerRect {
            x: self.cursor_x,
            y: self.cursor_y,
            w: needed_w,
            h: needed_h,
        };
        self.cursor_x = self.cursor_x.saturating_add(needed_w);
        self.row_h = self.row_h.max(needed_h);
        rect
    }

    /// Total height used so far, rounded up to a power of two. Saturates at
    /// the largest power of two a `u32` holds.
    pub fn height(&self) -> u32 {
        self.cursor_y
            .saturating_add(self.row_h)
            .max(1)
            .checked_next_power_of_two()
            .unwrap_or(1 << 31)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Normalized `[u, v, w, h]` of the rect shrunk by `inset` pixels per side,
    /// for a buffer of `atlas_h` rows.
    pub fn get_uv_param(&self, rect: &PackerRect, atlas_h: u32, inset: u32) -> [f32; 4] {
        let fw = self.width as f32;
        let fh = atlas_h as f32;
        let border = inset.saturating_mul(2);
        let content_w = rect.w.saturating_sub(border).max(1);
        let content_h = rect.h.saturating_sub(border).max(1);

        [
            rect.x.saturating_add(inset) as f32 / fw,
            rect.y.saturating_add(inset) as f32 / fh,
            content_w as f32 / fw,
            content_h as f32 / fh,
        ]
    }
}
