use std::sync::Arc;

use pixelperfect_core::{Color, ComputedBox, PixelBuffer};
use pixelperfect_text::{BitmapFont, HAlign, TextAlign, VAlign, draw_text, measure};
use taffy::AvailableSpace;

use crate::widget::wrap_width;
use crate::{FrameContext, PrepareContext, Widget};

/// Produces the text to show for a frame.
pub type TextSource = Box<dyn Fn(&FrameContext) -> String>;

/// When a text change should trigger re-layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDirtyPolicy {
    /// Any change in content.
    #[default]
    ContentChanged,
    /// Only a change in character count. Cheaper, but a same-length change
    /// in a proportional layout keeps the old box.
    LengthChanged,
}

/// A leaf that shows text from a [`TextSource`], wrapped to its box.
///
/// The text is pulled once per frame in `prepare`; measure and paint reuse
/// that value.
pub struct TextNode {
    font: Arc<BitmapFont>,
    source: TextSource,
    text: String,
    laid_out: String,
    color: Color,
    background: Color,
    align: TextAlign,
    policy: TextDirtyPolicy,
}

impl TextNode {
    pub fn new(font: Arc<BitmapFont>, source: impl Fn(&FrameContext) -> String + 'static) -> Self {
        Self {
            font,
            source: Box::new(source),
            text: String::new(),
            laid_out: String::new(),
            color: Color::GRAY,
            background: Color::BLACK,
            align: TextAlign::default(),
            policy: TextDirtyPolicy::default(),
        }
    }

    /// A label whose text never changes.
    pub fn fixed(font: Arc<BitmapFont>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(font, move |_| text.clone())
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.align.halign = halign;
        self.align.valign = valign;
        self
    }

    pub fn padding(mut self, left: u32, top: u32) -> Self {
        self.align = self.align.padding(left, top);
        self
    }

    pub fn dirty_policy(mut self, policy: TextDirtyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The text captured for the current frame.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &BitmapFont {
        &self.font
    }
}

impl Widget for TextNode {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) {
        self.text = (self.source)(cx.frame());
        let changed = match self.policy {
            TextDirtyPolicy::ContentChanged => self.text != self.laid_out,
            TextDirtyPolicy::LengthChanged => {
                self.text.chars().count() != self.laid_out.chars().count()
            }
        };
        if changed {
            log::trace!("text changed from {:?} to {:?}", self.laid_out, self.text);
            self.laid_out.clone_from(&self.text);
            cx.mark_dirty();
        }
    }

    fn measure(
        &mut self,
        known: taffy::Size<Option<f32>>,
        available: taffy::Size<AvailableSpace>,
    ) -> Option<taffy::Size<f32>> {
        if self.text.is_empty() {
            return Some(taffy::Size::ZERO);
        }
        let (w, h) = measure(&self.font, &self.text, wrap_width(known, available));
        Some(taffy::Size {
            width: w as f32,
            height: h as f32,
        })
    }

    fn paint(&mut self, buf: &mut PixelBuffer, _ctx: &FrameContext) {
        buf.fill(self.background);
        let rect = ComputedBox::from_size(buf.size());
        draw_text(buf, &self.font, rect, &self.text, self.color, self.align);
    }

    fn debug_name(&self) -> &'static str {
        "text"
    }
}
