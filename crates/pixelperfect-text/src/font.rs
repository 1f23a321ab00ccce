use std::path::Path;

use ahash::AHashMap;
use pixelperfect_core::{Color, PixelBuffer};

use crate::TextError;

/// One glyph bitmap, positioned the way BDF describes it: `x_offset` from the
/// pen position and `y_offset` from the baseline to the bitmap's bottom row.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    bits: Vec<bool>,
}

impl Glyph {
    pub fn new(width: u32, height: u32, x_offset: i32, y_offset: i32) -> Self {
        Self {
            width,
            height,
            x_offset,
            y_offset,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Rows given as bit masks, leftmost pixel in bit `width - 1`. Columns
    /// beyond bit 31 are blank.
    pub fn from_rows(width: u32, rows: &[u32]) -> Self {
        let mut g = Self::new(width, rows.len() as u32, 0, 0);
        for (y, row) in rows.iter().enumerate() {
            for x in 0..width {
                if row.checked_shr(width - 1 - x).is_some_and(|r| r & 1 == 1) {
                    g.set(x, y as u32);
                }
            }
        }
        g
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    fn set(&mut self, x: u32, y: u32) {
        let i = self.index(x, y);
        self.bits[i] = true;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// A monospace bitmap font: every glyph advances the pen by `advance`
/// pixels and every line is `line_height` pixels tall.
#[derive(Clone, Debug)]
pub struct BitmapFont {
    name: String,
    advance: u32,
    line_height: u32,
    baseline: u32,
    default_char: Option<char>,
    glyphs: AHashMap<char, Glyph>,
}

impl BitmapFont {
    pub fn new(name: impl Into<String>, advance: u32, line_height: u32, baseline: u32) -> Self {
        Self {
            name: name.into(),
            advance,
            line_height,
            baseline,
            default_char: None,
            glyphs: AHashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn advance(&self) -> u32 {
        self.advance
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    /// Distance from the top of a line to the baseline.
    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_default_char(&mut self, ch: Option<char>) {
        self.default_char = ch;
    }

    pub fn insert_glyph(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The glyph for `ch`, the default char's glyph, or `None` (drawn blank).
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.default_char.and_then(|d| self.glyphs.get(&d)))
    }

    /// Width of a single line of text. Newlines are not special here.
    pub fn line_width(&self, line: &str) -> u32 {
        line.chars().count() as u32 * self.advance
    }

    /// Draws one line with its top-left corner at `(x, y)`, blending over
    /// whatever is in `buf`.
    pub fn draw_line(&self, buf: &mut PixelBuffer, x: i32, y: i32, line: &str, color: Color) {
        let mut pen = x;
        for ch in line.chars() {
            if let Some(g) = self.glyph(ch) {
                let left = pen + g.x_offset;
                let top = y + self.baseline as i32 - (g.height as i32 + g.y_offset);
                for gy in 0..g.height {
                    for gx in 0..g.width {
                        if g.is_set(gx, gy) {
                            buf.blend(left + gx as i32, top + gy as i32, color);
                        }
                    }
                }
            }
            pen += self.advance as i32;
        }
    }

    pub fn load_bdf(path: impl AsRef<Path>) -> Result<Self, TextError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| TextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Self::parse_bdf(&src)?;
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => Ok(font.with_name(stem)),
            None => Ok(font),
        }
    }

    /// Parses the text form of a BDF 2.x font. The font is named after its
    /// `FONT` line; [`BitmapFont::load_bdf`] renames it after the file.
    pub fn parse_bdf(src: &str) -> Result<Self, TextError> {
        BdfParser::default().parse(src)
    }
}

#[derive(Default)]
struct BdfParser {
    name: String,
    bbox: Option<(u32, u32, i32, i32)>,
    ascent: Option<u32>,
    descent: Option<u32>,
    default_char: Option<u32>,
    glyphs: AHashMap<char, Glyph>,
}

struct PendingGlyph {
    encoding: Option<char>,
    bbx: Option<(u32, u32, i32, i32)>,
}

/// Largest glyph or font bounding box dimension accepted from a BDF file.
pub const MAX_GLYPH_SIZE: u32 = 256;

fn parse_err(line: usize, message: impl Into<String>) -> TextError {
    TextError::Parse {
        line: line + 1,
        message: message.into(),
    }
}

fn num<T: std::str::FromStr>(line: usize, field: Option<&str>, what: &str) -> Result<T, TextError> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| parse_err(line, format!("expected {what}")))
}

fn bounding_box(
    line: usize,
    fields: &mut std::str::SplitWhitespace<'_>,
    what: &str,
) -> Result<(u32, u32, i32, i32), TextError> {
    let (w, h, xo, yo) = four(line, fields, what)?;
    if w > MAX_GLYPH_SIZE || h > MAX_GLYPH_SIZE {
        return Err(parse_err(
            line,
            format!("{what} {w}x{h} exceeds {MAX_GLYPH_SIZE}x{MAX_GLYPH_SIZE}"),
        ));
    }
    Ok((w, h, xo, yo))
}

fn four<A, B>(line: usize, fields: &mut std::str::SplitWhitespace<'_>, what: &str) -> Result<(A, A, B, B), TextError>
where
    A: std::str::FromStr,
    B: std::str::FromStr,
{
    Ok((
        num(line, fields.next(), what)?,
        num(line, fields.next(), what)?,
        num(line, fields.next(), what)?,
        num(line, fields.next(), what)?,
    ))
}

impl BdfParser {
    fn parse(mut self, src: &str) -> Result<BitmapFont, TextError> {
        let mut lines = src.lines().enumerate();
        let mut pending: Option<PendingGlyph> = None;

        while let Some((ln, raw)) = lines.next() {
            let mut fields = raw.split_whitespace();
            let Some(keyword) = fields.next() else {
                continue;
            };
            match keyword {
                "FONT" => self.name = fields.collect::<Vec<_>>().join(" "),
                "FONTBOUNDINGBOX" => self.bbox = Some(bounding_box(ln, &mut fields, "bounding box")?),
                "FONT_ASCENT" => self.ascent = Some(num(ln, fields.next(), "ascent")?),
                "FONT_DESCENT" => self.descent = Some(num(ln, fields.next(), "descent")?),
                "DEFAULT_CHAR" => self.default_char = Some(num(ln, fields.next(), "default char")?),
                "STARTCHAR" => {
                    pending = Some(PendingGlyph {
                        encoding: None,
                        bbx: None,
                    })
                }
                "ENCODING" => {
                    let code: i64 = num(ln, fields.next(), "encoding")?;
                    let glyph = pending
                        .as_mut()
                        .ok_or_else(|| parse_err(ln, "ENCODING outside STARTCHAR"))?;
                    glyph.encoding = u32::try_from(code).ok().and_then(char::from_u32);
                }
                "BBX" => {
                    let bbx = bounding_box(ln, &mut fields, "glyph bounding box")?;
                    pending
                        .as_mut()
                        .ok_or_else(|| parse_err(ln, "BBX outside STARTCHAR"))?
                        .bbx = Some(bbx);
                }
                "BITMAP" => {
                    let glyph = pending
                        .take()
                        .ok_or_else(|| parse_err(ln, "BITMAP outside STARTCHAR"))?;
                    let (w, h, xo, yo) = match glyph.bbx.or(self.bbox) {
                        Some(b) => b,
                        None => return Err(parse_err(ln, "glyph without BBX")),
                    };
                    let mut bitmap = Glyph::new(w, h, xo, yo);
                    for row in 0..h {
                        let (rln, hex) = lines
                            .next()
                            .ok_or_else(|| parse_err(ln, "truncated BITMAP"))?;
                        decode_row(rln, hex.trim(), row, &mut bitmap)?;
                    }
                    if let Some(ch) = glyph.encoding {
                        self.glyphs.insert(ch, bitmap);
                    }
                }
                _ => {}
            }
        }

        let (bw, bh, _, by) = self
            .bbox
            .ok_or_else(|| parse_err(0, "missing FONTBOUNDINGBOX"))?;
        let ascent = self.ascent.unwrap_or((bh as i32 + by).max(0) as u32);
        let descent = self.descent.unwrap_or((-by).max(0) as u32);

        let mut font = BitmapFont::new(self.name, bw, ascent + descent, ascent);
        font.glyphs = self.glyphs;
        font.default_char = self.default_char.and_then(char::from_u32);
        log::debug!(
            "parsed BDF font `{}`: {} glyphs, advance {}, line height {}",
            font.name,
            font.glyphs.len(),
            font.advance,
            font.line_height
        );
        Ok(font)
    }
}

fn decode_row(line: usize, hex: &str, row: u32, glyph: &mut Glyph) -> Result<(), TextError> {
    let bytes = hex.as_bytes();
    for x in 0..glyph.width {
        let nibble_at = (x / 4) as usize;
        let Some(&digit) = bytes.get(nibble_at) else {
            break;
        };
        let nibble = (digit as char)
            .to_digit(16)
            .ok_or_else(|| parse_err(line, format!("bad hex digit in `{hex}`")))?;
        if nibble >> (3 - x % 4) & 1 == 1 {
            glyph.set(x, row);
        }
    }
    Ok(())
}
