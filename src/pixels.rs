//! Owned pixel storage shared by the atlas builder and gradient generator.

/// Channel index of luminance in a two-channel buffer.
pub const LUMINANCE: usize = 0;
/// Channel index of alpha in a two-channel buffer.
pub const ALPHA: usize = 1;

/// Row-major interleaved 8-bit pixels with an explicit channel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0u8; width as usize * height as usize * channels],
        }
    }

    /// A (luminance, alpha) buffer, the layout atlases and gradients use.
    pub fn new_luminance_alpha(width: u32, height: u32) -> Self {
        Self::new(width, height, 2)
    }

    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> anyhow::Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(channels))
            .ok_or_else(|| anyhow::anyhow!("invalid pixel buffer size"))?;
        if data.len() != expected {
            return Err(anyhow::anyhow!(
                "invalid pixel data length: got {}, expected {}",
                data.len(),
                expected
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * self.channels)
        } else {
            None
        }
    }

    /// Pixel at (x, y), or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let i = self.index(x, y)?;
        Some(&self.data[i..i + self.channels])
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        let i = self.index(x, y)?;
        let c = self.channels;
        Some(&mut self.data[i..i + c])
    }

    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels)
    }

    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(self.channels)
    }

    /// Writes a single-channel bitmap into `channel` with its top-left at (x, y).
    /// Rows and columns that fall outside the buffer are clipped.
    pub fn blit_channel(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        x: u32,
        y: u32,
        channel: usize,
    ) {
        for row in 0..src_h {
            for col in 0..src_w {
                let Some(value) = src.get((row * src_w + col) as usize) else {
                    continue;
                };
                let (Some(dx), Some(dy)) = (x.checked_add(col), y.checked_add(row)) else {
                    continue;
                };
                if let Some(p) = self.pixel_mut(dx, dy) {
                    p[channel] = *value;
                }
            }
        }
    }

    /// Rotates the buffer by `turns` quarter turns counter-clockwise.
    pub fn rotated_quarter(&self, turns: u32) -> Self {
        let turns = turns % 4;
        let (w, h) = (self.width, self.height);
        let (out_w, out_h) = if turns % 2 == 0 { (w, h) } else { (h, w) };
        let mut out = Self::new(out_w, out_h, self.channels);
        for y in 0..h {
            for x in 0..w {
                let (nx, ny) = match turns {
                    0 => (x, y),
                    1 => (y, w - 1 - x),
                    2 => (w - 1 - x, h - 1 - y),
                    _ => (h - 1 - y, x),
                };
                if let (Some(src), Some(dst)) = (self.index(x, y), out.index(nx, ny)) {
                    out.data[dst..dst + self.channels]
                        .copy_from_slice(&self.data[src..src + self.channels]);
                }
            }
        }
        out
    }

    #[cfg(feature = "utils")]
    pub fn to_image(&self) -> anyhow::Result<image::DynamicImage> {
        let img = match self.channels {
            1 => image::DynamicImage::ImageLuma8(
                image::GrayImage::from_raw(self.width, self.height, self.data.clone())
                    .ok_or_else(|| anyhow::anyhow!("invalid luminance buffer"))?,
            ),
            2 => image::DynamicImage::ImageLumaA8(
                image::GrayAlphaImage::from_raw(self.width, self.height, self.data.clone())
                    .ok_or_else(|| anyhow::anyhow!("invalid luminance/alpha buffer"))?,
            ),
            n => return Err(anyhow::anyhow!("unsupported channel count {}", n)),
        };
        Ok(img)
    }

    /// Writes the buffer as a PNG, mostly for inspecting atlases.
    #[cfg(feature = "utils")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, 2, vec![0; 8]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, 2, vec![0; 7]).is_err());
    }

    #[test]
    fn test_blit_clips_outside() {
        let mut buf = PixelBuffer::new_luminance_alpha(4, 4);
        let src = [1u8, 2, 3, 4, 5, 6];
        buf.blit_channel(&src, 3, 2, 2, 3, LUMINANCE);
        assert_eq!(buf.pixel(2, 3), Some(&[1u8, 0][..]));
        assert_eq!(buf.pixel(3, 3), Some(&[2u8, 0][..]));
        assert_eq!(buf.pixel(0, 0), Some(&[0u8, 0][..]));
    }

    #[test]
    fn test_rotated_quarter() {
        // 3x2 single channel:
        // 1 2 3
        // 4 5 6
        let buf = PixelBuffer::from_raw(3, 2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();

        let r1 = buf.rotated_quarter(1);
        assert_eq!((r1.width(), r1.height()), (2, 3));
        assert_eq!(r1.data(), &[3, 6, 2, 5, 1, 4]);

        let r2 = buf.rotated_quarter(2);
        assert_eq!(r2.data(), &[6, 5, 4, 3, 2, 1]);

        let r3 = buf.rotated_quarter(3);
        assert_eq!(r3.data(), &[4, 1, 5, 2, 6, 3]);

        assert_eq!(buf.rotated_quarter(4), buf);
    }
}
