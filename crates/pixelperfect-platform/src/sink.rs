use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use pixelperfect_core::{Color, PixelBuffer, Size};

use crate::PlatformError;

/// Where finished frames go.
pub trait DisplaySink {
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), PlatformError>;

    /// Blanks the display.
    fn clear(&mut self) -> Result<(), PlatformError>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), PlatformError> {
        (**self).present(frame)
    }

    fn clear(&mut self) -> Result<(), PlatformError> {
        (**self).clear()
    }
}

const UPPER_HALF: char = '\u{2580}';

/// Emulates the matrix in a truecolor terminal. Each character cell shows
/// two pixels stacked vertically using an upper half block.
pub struct AnsiSink<W: Write> {
    out: W,
    /// Terminal rows written by the previous frame; the cursor is moved back
    /// over them before the next one.
    rows_drawn: u32,
    last_size: Size,
}

impl AnsiSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AnsiSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows_drawn: 0,
            last_size: Size::ZERO,
        }
    }

    fn render(&mut self, frame: &PixelBuffer) -> io::Result<()> {
        let mut s = String::with_capacity((frame.width() as usize * 40 + 8) * frame.height() as usize / 2 + 16);
        if self.rows_drawn > 0 {
            s.push_str(&format!("\x1b[{}A\r", self.rows_drawn));
        } else {
            s.push_str("\x1b[?25l");
        }
        let rows = frame.height().div_ceil(2);
        for row in 0..rows {
            let y = (row * 2) as i32;
            for x in 0..frame.width() as i32 {
                let top = opaque(frame.get(x, y));
                let bottom = opaque(frame.get(x, y + 1));
                s.push_str(&format!(
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{UPPER_HALF}",
                    top.0, top.1, top.2, bottom.0, bottom.1, bottom.2
                ));
            }
            s.push_str("\x1b[0m\n");
        }
        self.out.write_all(s.as_bytes())?;
        self.out.flush()?;
        self.rows_drawn = rows;
        self.last_size = frame.size();
        Ok(())
    }
}

fn opaque(c: Option<Color>) -> Color {
    c.map_or(Color::BLACK, |c| c.over(Color::BLACK))
}

impl<W: Write> DisplaySink for AnsiSink<W> {
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), PlatformError> {
        Ok(self.render(frame)?)
    }

    fn clear(&mut self) -> Result<(), PlatformError> {
        if self.last_size.is_empty() {
            return Ok(());
        }
        let blank = PixelBuffer::filled(self.last_size.width, self.last_size.height, Color::BLACK);
        Ok(self.render(&blank)?)
    }
}

impl<W: Write> Drop for AnsiSink<W> {
    fn drop(&mut self) {
        if self.rows_drawn > 0 {
            let _ = self.out.write_all(b"\x1b[0m\x1b[?25h");
            let _ = self.out.flush();
        }
    }
}

#[derive(Default)]
struct MemoryLog {
    presented: u64,
    clears: u64,
    last: Option<PixelBuffer>,
}

/// Keeps the last presented frame in memory. Clones share the same record.
#[derive(Clone, Default)]
pub struct MemorySink {
    log: Rc<RefCell<MemoryLog>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.log.borrow().presented
    }

    pub fn clears(&self) -> u64 {
        self.log.borrow().clears
    }

    /// The most recent frame, or `None` if nothing was presented since the
    /// last clear.
    pub fn last_frame(&self) -> Option<PixelBuffer> {
        self.log.borrow().last.clone()
    }
}

impl DisplaySink for MemorySink {
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), PlatformError> {
        let mut log = self.log.borrow_mut();
        log.presented += 1;
        log.last = Some(frame.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PlatformError> {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.last = None;
        Ok(())
    }
}
