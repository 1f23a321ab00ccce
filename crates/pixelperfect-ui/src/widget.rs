use std::any::Any;

use pixelperfect_core::PixelBuffer;
use taffy::{AvailableSpace, NodeId};

/// What every widget sees during one frame. Built once per tick; the same
/// value is handed to every prepare, panel and paint call of that frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    /// Wall-clock seconds, frozen for the frame.
    pub now: f64,
    pub frame: u64,
}

impl FrameContext {
    pub fn new(now: f64, frame: u64) -> Self {
        Self { now, frame }
    }
}

/// Requests a widget can make while the tree is being prepared for a frame.
/// They are applied by the tree once the widget's `prepare` returns.
pub struct PrepareContext<'a> {
    frame: &'a FrameContext,
    node: NodeId,
    children: &'a [NodeId],
    pub(crate) dirty: bool,
    pub(crate) new_children: Option<Vec<NodeId>>,
}

impl<'a> PrepareContext<'a> {
    pub(crate) fn new(frame: &'a FrameContext, node: NodeId, children: &'a [NodeId]) -> Self {
        Self {
            frame,
            node,
            children,
            dirty: false,
            new_children: None,
        }
    }

    pub fn frame(&self) -> &FrameContext {
        self.frame
    }

    pub fn now(&self) -> f64 {
        self.frame.now
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current children, before any replacement requested here.
    pub fn children(&self) -> &[NodeId] {
        self.children
    }

    /// The widget's measured size may have changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replace the node's children in one step.
    pub fn set_children(&mut self, children: Vec<NodeId>) {
        self.new_children = Some(children);
    }
}

/// A drawable node's behavior. The tree owns geometry and buffers; a widget
/// only measures itself and paints into the buffer it is given, in local
/// coordinates.
pub trait Widget: Any {
    /// Runs before layout every frame the node is attached. Capture any data
    /// that measure and paint need here so both see the same values.
    fn prepare(&mut self, _cx: &mut PrepareContext<'_>) {}

    /// Content size for a leaf. `None` means the widget cannot size itself
    /// and must be given an explicit size.
    fn measure(
        &mut self,
        _known: taffy::Size<Option<f32>>,
        _available: taffy::Size<AvailableSpace>,
    ) -> Option<taffy::Size<f32>> {
        None
    }

    /// Paints background and content. Children are drawn on top afterwards.
    fn paint(&mut self, buf: &mut PixelBuffer, ctx: &FrameContext);

    fn debug_name(&self) -> &'static str;
}

/// Width to wrap content at for a measure request.
///
/// Min-content asks for the narrowest layout (one word per line), max-content
/// for a single unbroken line.
pub fn wrap_width(known: taffy::Size<Option<f32>>, available: taffy::Size<AvailableSpace>) -> u32 {
    if let Some(w) = known.width {
        return w.max(0.0) as u32;
    }
    match available.width {
        AvailableSpace::Definite(w) => w.max(0.0) as u32,
        AvailableSpace::MinContent => 1,
        AvailableSpace::MaxContent => 1024,
    }
}
