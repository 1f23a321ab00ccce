/// Pixel offset inside a buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Box assigned to a node by the last layout solve, in whole pixels.
///
/// `x`/`y` are relative to the parent node's box; compositing a node into its
/// parent's buffer uses exactly this offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComputedBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ComputedBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A box at the origin covering `size`.
    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x + self.width as i32
            && p.y < self.y + self.height as i32
    }

    pub fn translate(mut self, dx: i32, dy: i32) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Shrinks the box from the left and top edges; never goes negative.
    pub fn inset(self, left: u32, top: u32) -> Self {
        Self {
            x: self.x + left.min(self.width) as i32,
            y: self.y + top.min(self.height) as i32,
            width: self.width.saturating_sub(left),
            height: self.height.saturating_sub(top),
        }
    }
}
