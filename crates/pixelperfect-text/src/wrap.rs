use crate::BitmapFont;

/// The result of breaking text into lines for a given width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    /// Widest line, in pixels.
    pub width: u32,
    /// `lines.len() * line_height`.
    pub height: u32,
}

impl WrappedText {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Greedy word wrap on spaces.
///
/// Words accumulate on a line while it stays within `max_width`. A word that
/// is wider than `max_width` on its own gets a line to itself and is never
/// split. `\n` always starts a new line. Empty text wraps to nothing (0x0).
pub fn wrap(font: &BitmapFont, text: &str, max_width: u32) -> WrappedText {
    if text.is_empty() {
        return WrappedText::default();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(font, paragraph, max_width, &mut lines);
    }

    let width = lines.iter().map(|l| font.line_width(l)).max().unwrap_or(0);
    let height = lines.len() as u32 * font.line_height();
    WrappedText {
        lines,
        width,
        height,
    }
}

fn wrap_paragraph(font: &BitmapFont, paragraph: &str, max_width: u32, out: &mut Vec<String>) {
    if font.line_width(paragraph) <= max_width {
        out.push(paragraph.to_string());
        return;
    }

    let mut line = String::new();
    let mut words = paragraph.split(' ').peekable();
    while let Some(&word) = words.peek() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if font.line_width(&candidate) <= max_width {
            line = candidate;
            words.next();
        } else if line.is_empty() {
            // Too wide even alone.
            out.push(word.to_string());
            words.next();
        } else {
            out.push(std::mem::take(&mut line));
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
}

/// Size of `text` wrapped to `max_width`, as `(width, height)`.
pub fn measure(font: &BitmapFont, text: &str, max_width: u32) -> (u32, u32) {
    let wrapped = wrap(font, text, max_width);
    (wrapped.width, wrapped.height)
}
