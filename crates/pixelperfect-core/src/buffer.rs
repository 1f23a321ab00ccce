use crate::{Color, ComputedBox, CoreError, Size};

/// RGBA raster owned by a drawable node, or the final frame handed to a display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; area(width, height)],
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; area(width, height)],
        }
    }

    /// Builds a buffer from packed RGBA bytes (4 bytes per pixel, row-major).
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, CoreError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(CoreError::TooLarge { width, height })?;
        if bytes.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Color(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Reallocates only when the requested size differs. Returns true if it did.
    pub fn ensure_size(&mut self, size: Size) -> bool {
        if self.size() == size {
            return false;
        }
        *self = PixelBuffer::new(size.width, size.height);
        true
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes a pixel, replacing whatever was there; out of bounds is ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Composites a pixel over the existing one; out of bounds is ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(Color::TRANSPARENT);
    }

    pub fn fill_rect(&mut self, rect: ComputedBox, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// One-pixel outline covering exactly `rect` (inclusive edges).
    pub fn stroke_rect(&mut self, rect: ComputedBox, color: Color) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let right = rect.x + rect.width as i32 - 1;
        let bottom = rect.y + rect.height as i32 - 1;
        for x in rect.x..=right {
            self.set(x, rect.y, color);
            self.set(x, bottom, color);
        }
        for y in rect.y..=bottom {
            self.set(rect.x, y, color);
            self.set(right, y, color);
        }
    }

    /// Alpha-composites `src` into this buffer with its top-left at `(x, y)`.
    pub fn composite(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let target = ComputedBox::new(x, y, src.width, src.height);
        let Some((x0, y0, x1, y1)) = self.clip(target) else {
            return;
        };
        for dy in y0..y1 {
            for dx in x0..x1 {
                let s = src.pixels[(dy - y) as usize * src.width as usize + (dx - x) as usize];
                let i = dy as usize * self.width as usize + dx as usize;
                self.pixels[i] = s.over(self.pixels[i]);
            }
        }
    }

    /// Packed RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.0, c.1, c.2, c.3])
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn clip(&self, rect: ComputedBox) -> Option<(i32, i32, i32, i32)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.width as i32).min(self.width as i32);
        let y1 = (rect.y + rect.height as i32).min(self.height as i32);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

fn area(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
