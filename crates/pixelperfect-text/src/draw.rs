use pixelperfect_core::{Color, ComputedBox, PixelBuffer};

use crate::{BitmapFont, wrap};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Placement of a text block inside its box. Padding insets the block from
/// the left and top edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextAlign {
    pub halign: HAlign,
    pub valign: VAlign,
    pub pad_left: u32,
    pub pad_top: u32,
}

impl TextAlign {
    pub fn new(halign: HAlign, valign: VAlign) -> Self {
        Self {
            halign,
            valign,
            ..Default::default()
        }
    }

    pub fn padding(mut self, left: u32, top: u32) -> Self {
        self.pad_left = left;
        self.pad_top = top;
        self
    }
}

/// Wraps `text` to the box width (less left padding) and draws it aligned
/// inside `rect`. Lines of a wrapped block are aligned individually; a block
/// taller or wider than the box is pinned to the top-left instead of being
/// pushed off the edge.
pub fn draw_text(
    buf: &mut PixelBuffer,
    font: &BitmapFont,
    rect: ComputedBox,
    text: &str,
    color: Color,
    align: TextAlign,
) {
    let avail = rect.width.saturating_sub(align.pad_left);
    let wrapped = wrap(font, text, avail);
    if wrapped.is_empty() {
        return;
    }

    let w = rect.width as i32;
    let h = rect.height as i32;
    let pad_left = align.pad_left as i32;
    let pad_top = align.pad_top as i32;
    let block_w = wrapped.width as i32;
    let block_h = wrapped.height as i32;

    let mut x = match align.halign {
        HAlign::Left => 0,
        HAlign::Center => (w - block_w - pad_left).div_euclid(2),
        HAlign::Right => w - block_w,
    };
    let mut y = match align.valign {
        VAlign::Top => 0,
        VAlign::Middle => (h - block_h - pad_top).div_euclid(2),
        VAlign::Bottom => h - block_h,
    };
    if wrapped.lines.len() > 1 {
        x = x.max(0);
        y = y.max(0);
    }

    let origin_x = rect.x + pad_left + x;
    let mut line_y = rect.y + pad_top + y;
    for line in &wrapped.lines {
        let line_w = font.line_width(line) as i32;
        let dx = match align.halign {
            HAlign::Left => 0,
            HAlign::Center => (block_w - line_w) / 2,
            HAlign::Right => block_w - line_w,
        };
        font.draw_line(buf, origin_x + dx, line_y, line, color);
        line_y += font.line_height() as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_font;

    fn lit(buf: &PixelBuffer) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..buf.height() as i32 {
            for x in 0..buf.width() as i32 {
                if buf.get(x, y) != Some(Color::TRANSPARENT) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn bounds(points: &[(i32, i32)]) -> (i32, i32, i32, i32) {
        let min_x = points.iter().map(|p| p.0).min().unwrap();
        let min_y = points.iter().map(|p| p.1).min().unwrap();
        let max_x = points.iter().map(|p| p.0).max().unwrap();
        let max_y = points.iter().map(|p| p.1).max().unwrap();
        (min_x, min_y, max_x, max_y)
    }

    #[test]
    fn test_draw_text_top_left() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(20, 10);
        let rect = ComputedBox::new(0, 0, 20, 10);
        draw_text(&mut buf, &font, rect, "8", Color::WHITE, TextAlign::new(HAlign::Left, VAlign::Top));
        // '8' is a full 3x5 block outline.
        assert_eq!(bounds(&lit(&buf)), (0, 0, 2, 4));
    }

    #[test]
    fn test_draw_text_centered() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(20, 10);
        let rect = ComputedBox::new(0, 0, 20, 10);
        draw_text(&mut buf, &font, rect, "8", Color::WHITE, TextAlign::default());
        // Block is 4x6 (advance and line height); (20-4)/2 = 8, (10-6)/2 = 2.
        assert_eq!(bounds(&lit(&buf)), (8, 2, 10, 6));
    }

    #[test]
    fn test_draw_text_bottom_right_with_padding() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(20, 10);
        let rect = ComputedBox::new(0, 0, 20, 10);
        let align = TextAlign::new(HAlign::Right, VAlign::Bottom).padding(2, 1);
        draw_text(&mut buf, &font, rect, "8", Color::WHITE, align);
        // x = 2 + (20 - 4) = 18, y = 1 + (10 - 6) = 5; glyph is 3x5 of the 4x6 cell.
        assert_eq!(bounds(&lit(&buf)), (18, 5, 19, 9));
    }

    #[test]
    fn test_draw_text_wrapped_lines_are_centered_individually() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(16, 16);
        let rect = ComputedBox::new(0, 0, 16, 16);
        draw_text(&mut buf, &font, rect, "888 8", Color::WHITE, TextAlign::new(HAlign::Center, VAlign::Top));
        // "888 8" is 20px so it wraps to "888" (12px) and "8" (4px).
        // Block x = (16 - 12) / 2 = 2; second line gets (12 - 4) / 2 = 4 more.
        let points = lit(&buf);
        let first: Vec<_> = points.iter().copied().filter(|p| p.1 < 6).collect();
        let second: Vec<_> = points.iter().copied().filter(|p| p.1 >= 6).collect();
        assert_eq!(bounds(&first), (2, 0, 12, 4));
        assert_eq!(bounds(&second), (6, 6, 8, 10));
    }

    #[test]
    fn test_draw_text_wrapped_block_clamps_to_origin() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(8, 8);
        let rect = ComputedBox::new(0, 0, 8, 8);
        // Two lines of 12px into an 8px box: would start at x = -2, y = -2.
        draw_text(&mut buf, &font, rect, "888 888", Color::WHITE, TextAlign::default());
        let (min_x, min_y, _, _) = bounds(&lit(&buf));
        assert_eq!((min_x, min_y), (0, 0));
    }

    #[test]
    fn test_draw_text_respects_rect_offset() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(20, 20);
        let rect = ComputedBox::new(5, 7, 4, 6);
        draw_text(&mut buf, &font, rect, "8", Color::WHITE, TextAlign::default());
        assert_eq!(bounds(&lit(&buf)), (5, 7, 7, 11));
    }

    #[test]
    fn test_draw_empty_text_is_noop() {
        let font = builtin_font();
        let mut buf = PixelBuffer::new(4, 4);
        draw_text(&mut buf, &font, ComputedBox::new(0, 0, 4, 4), "", Color::WHITE, TextAlign::default());
        assert!(lit(&buf).is_empty());
    }
}
