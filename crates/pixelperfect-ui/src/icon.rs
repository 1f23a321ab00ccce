use std::path::Path;

use pixelperfect_core::{Color, PixelBuffer};
use pixelperfect_text::{HAlign, VAlign};
use taffy::AvailableSpace;

use crate::{FrameContext, UiError, Widget};

/// A leaf that shows a fixed RGBA image at its natural size.
pub struct IconNode {
    icon: PixelBuffer,
    background: Color,
    halign: HAlign,
    valign: VAlign,
}

impl IconNode {
    pub fn new(icon: PixelBuffer) -> Self {
        Self {
            icon,
            background: Color::BLACK,
            halign: HAlign::Left,
            valign: VAlign::Middle,
        }
    }

    /// Decodes a PNG (or any format the `image` crate was built with).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, UiError> {
        let img = image::open(path.as_ref())?.to_rgba8();
        let (w, h) = img.dimensions();
        let icon = PixelBuffer::from_rgba(w, h, img.as_raw())?;
        log::debug!("loaded {}x{} icon from {}", w, h, path.as_ref().display());
        Ok(Self::new(icon))
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn icon(&self) -> &PixelBuffer {
        &self.icon
    }
}

impl Widget for IconNode {
    fn measure(
        &mut self,
        _known: taffy::Size<Option<f32>>,
        _available: taffy::Size<AvailableSpace>,
    ) -> Option<taffy::Size<f32>> {
        Some(taffy::Size {
            width: self.icon.width() as f32,
            height: self.icon.height() as f32,
        })
    }

    fn paint(&mut self, buf: &mut PixelBuffer, _ctx: &FrameContext) {
        buf.fill(self.background);
        let free_w = buf.width() as i32 - self.icon.width() as i32;
        let free_h = buf.height() as i32 - self.icon.height() as i32;
        let x = match self.halign {
            HAlign::Left => 0,
            HAlign::Center => free_w.div_euclid(2),
            HAlign::Right => free_w,
        };
        let y = match self.valign {
            VAlign::Top => 0,
            VAlign::Middle => free_h.div_euclid(2),
            VAlign::Bottom => free_h,
        };
        buf.composite(&self.icon, x, y);
    }

    fn debug_name(&self) -> &'static str {
        "icon"
    }
}
