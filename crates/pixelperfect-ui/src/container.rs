use pixelperfect_core::{Color, PixelBuffer};
use taffy::AvailableSpace;

use crate::{FrameContext, Widget};

/// A plain box that fills its background and lets the tree draw its
/// children on top.
#[derive(Clone, Debug)]
pub struct ContainerNode {
    pub background: Color,
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
        }
    }
}

impl ContainerNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

impl Widget for ContainerNode {
    // Only consulted when the container has no children.
    fn measure(
        &mut self,
        _known: taffy::Size<Option<f32>>,
        _available: taffy::Size<AvailableSpace>,
    ) -> Option<taffy::Size<f32>> {
        Some(taffy::Size::ZERO)
    }

    fn paint(&mut self, buf: &mut PixelBuffer, _ctx: &FrameContext) {
        buf.fill(self.background);
    }

    fn debug_name(&self) -> &'static str {
        "container"
    }
}
