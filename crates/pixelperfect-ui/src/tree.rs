use std::any::Any;

use pixelperfect_core::{Color, ComputedBox, PixelBuffer, Size};
use taffy::{AvailableSpace, NodeId, TaffyTree};

use crate::style::{Length, style_from_layout};
use crate::{FrameContext, LayoutStyle, PrepareContext, UiError, Widget};

struct NodeData {
    widget: Box<dyn Widget>,
    style: LayoutStyle,
    buffer: PixelBuffer,
    debug_border: Option<Color>,
    /// Cleared by any change that can move or resize this node; set again
    /// for every attached node by a solve.
    layout_valid: bool,
}

/// The retained tree of drawable nodes.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. A node can be
/// detached from its parent and reattached later without losing its widget
/// state; carousel panels rely on this.
///
/// Layout is lazy: structural changes and explicit dirty marks only flag the
/// node and its ancestors, and [`LayoutTree::draw`] solves once per frame if
/// the root is flagged.
pub struct LayoutTree {
    taffy: TaffyTree<NodeData>,
    solves: u64,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            solves: 0,
        }
    }

    pub fn insert(&mut self, widget: impl Widget, style: LayoutStyle) -> Result<NodeId, UiError> {
        let data = NodeData {
            widget: Box::new(widget),
            style,
            buffer: PixelBuffer::default(),
            debug_border: None,
            layout_valid: false,
        };
        Ok(self.taffy.new_leaf_with_context(style_from_layout(&style), data)?)
    }

    pub fn len(&self) -> usize {
        self.taffy.total_node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), UiError> {
        self.data(parent)?;
        self.data(child)?;
        self.taffy.add_child(parent, child)?;
        self.invalidate(parent);
        self.invalidate_subtree(child);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), UiError> {
        self.data(parent)?;
        self.taffy.remove_child(parent, child)?;
        self.invalidate(parent);
        self.invalidate_subtree(child);
        Ok(())
    }

    /// Replaces all children of `parent` in a single step.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), UiError> {
        self.data(parent)?;
        for &c in children {
            self.data(c)?;
        }
        let old = self.taffy.children(parent)?;
        self.taffy.set_children(parent, children)?;
        self.invalidate(parent);
        for &c in old.iter().chain(children) {
            self.invalidate_subtree(c);
        }
        Ok(())
    }

    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>, UiError> {
        self.data(node)?;
        Ok(self.taffy.children(node)?)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.taffy.parent(node)
    }

    pub fn style(&self, node: NodeId) -> Result<LayoutStyle, UiError> {
        Ok(self.data(node)?.style)
    }

    pub fn set_style(&mut self, node: NodeId, style: LayoutStyle) -> Result<(), UiError> {
        self.data_mut(node)?.style = style;
        self.taffy.set_style(node, style_from_layout(&style))?;
        self.invalidate(node);
        Ok(())
    }

    /// Flags `node` (and everything above it) for re-layout before the next paint.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<(), UiError> {
        self.data(node)?;
        self.taffy.mark_dirty(node)?;
        self.invalidate(node);
        Ok(())
    }

    pub fn is_dirty(&self, node: NodeId) -> Result<bool, UiError> {
        Ok(!self.data(node)?.layout_valid)
    }

    /// Number of layout solves performed so far.
    pub fn solve_count(&self) -> u64 {
        self.solves
    }

    pub fn set_debug_border(&mut self, node: NodeId, color: Option<Color>) -> Result<(), UiError> {
        self.data_mut(node)?.debug_border = color;
        Ok(())
    }

    pub fn debug_border(&self, node: NodeId) -> Result<Option<Color>, UiError> {
        Ok(self.data(node)?.debug_border)
    }

    pub fn debug_name(&self, node: NodeId) -> Result<&'static str, UiError> {
        Ok(self.data(node)?.widget.debug_name())
    }

    pub fn widget<W: Widget>(&self, node: NodeId) -> Option<&W> {
        let data = self.taffy.get_node_context(node)?;
        let any: &dyn Any = &*data.widget;
        any.downcast_ref()
    }

    /// Mutable access to a widget. Changes that affect its size must be
    /// followed by [`LayoutTree::mark_dirty`].
    pub fn widget_mut<W: Widget>(&mut self, node: NodeId) -> Option<&mut W> {
        let data = self.taffy.get_node_context_mut(node)?;
        let any: &mut dyn Any = &mut *data.widget;
        any.downcast_mut()
    }

    /// `root` and everything attached below it, parents before children.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Ok(children) = self.taffy.children(n) {
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }

    /// Solves layout for the subtree under `root` within `available` pixels.
    pub fn compute_layout(&mut self, root: NodeId, available: Size) -> Result<(), UiError> {
        self.data(root)?;
        let space = taffy::Size {
            width: AvailableSpace::Definite(available.width as f32),
            height: AvailableSpace::Definite(available.height as f32),
        };

        let mut failure: Option<UiError> = None;
        self.taffy
            .compute_layout_with_measure(root, space, |known, avail, node, ctx, _style| {
                if let taffy::Size {
                    width: Some(width),
                    height: Some(height),
                } = known
                {
                    return taffy::Size { width, height };
                }
                let Some(data) = ctx else {
                    return taffy::Size::ZERO;
                };
                if let (Length::Px(width), Length::Px(height)) = (data.style.width, data.style.height) {
                    return taffy::Size { width, height };
                }
                match data.widget.measure(known, avail) {
                    Some(size) => size,
                    None => {
                        if failure.is_none() {
                            failure = Some(UiError::Unmeasurable {
                                node,
                                widget: data.widget.debug_name(),
                            });
                        }
                        taffy::Size::ZERO
                    }
                }
            })?;
        if let Some(e) = failure {
            return Err(e);
        }

        self.solves += 1;
        for n in self.descendants(root) {
            if let Some(data) = self.taffy.get_node_context_mut(n) {
                data.layout_valid = true;
            }
        }
        log::debug!(
            "layout solve #{} for {} node(s) in {}x{}",
            self.solves,
            self.descendants(root).len(),
            available.width,
            available.height
        );
        Ok(())
    }

    /// The node's box from the last solve, relative to its parent.
    pub fn get_box(&self, node: NodeId) -> Result<ComputedBox, UiError> {
        if !self.data(node)?.layout_valid {
            return Err(UiError::LayoutNotComputed(node));
        }
        let l = self.taffy.layout(node)?;
        Ok(ComputedBox::new(
            l.location.x.round() as i32,
            l.location.y.round() as i32,
            l.size.width.round().max(0.0) as u32,
            l.size.height.round().max(0.0) as u32,
        ))
    }

    /// The node's box in the root's coordinate space.
    pub fn absolute_box(&self, node: NodeId) -> Result<ComputedBox, UiError> {
        let mut b = self.get_box(node)?;
        let mut cur = node;
        while let Some(parent) = self.taffy.parent(cur) {
            let pb = self.get_box(parent)?;
            b = b.translate(pb.x, pb.y);
            cur = parent;
        }
        Ok(b)
    }

    /// Renders one frame of the subtree under `root` into `target`.
    ///
    /// Every attached widget is prepared first (which may swap children or
    /// flag nodes dirty), then layout is solved at most once, then nodes
    /// paint parents-first and composite into their parent's buffer.
    pub fn draw(&mut self, root: NodeId, target: &mut PixelBuffer, ctx: &FrameContext) -> Result<(), UiError> {
        self.prepare_node(root, ctx)?;
        if self.is_dirty(root)? {
            self.compute_layout(root, target.size())?;
        }
        self.draw_node(root, target, ctx)
    }

    fn prepare_node(&mut self, node: NodeId, ctx: &FrameContext) -> Result<(), UiError> {
        let children = self.taffy.children(node)?;
        let (dirty, new_children) = {
            let data = self.data_mut(node)?;
            let mut cx = PrepareContext::new(ctx, node, &children);
            data.widget.prepare(&mut cx);
            (cx.dirty, cx.new_children)
        };
        if let Some(new) = new_children
            && new != children
        {
            self.set_children(node, &new)?;
        }
        if dirty {
            self.mark_dirty(node)?;
        }
        for child in self.taffy.children(node)? {
            self.prepare_node(child, ctx)?;
        }
        Ok(())
    }

    fn draw_node(&mut self, node: NodeId, parent: &mut PixelBuffer, ctx: &FrameContext) -> Result<(), UiError> {
        let b = self.get_box(node)?;
        let children = self.taffy.children(node)?;

        let mut buf = {
            let data = self.data_mut(node)?;
            let mut buf = std::mem::take(&mut data.buffer);
            if !buf.ensure_size(b.size()) {
                buf.clear();
            }
            data.widget.paint(&mut buf, ctx);
            buf
        };
        for child in children {
            self.draw_node(child, &mut buf, ctx)?;
        }

        let data = self.data_mut(node)?;
        if let Some(color) = data.debug_border {
            buf.stroke_rect(ComputedBox::from_size(buf.size()), color);
        }
        parent.composite(&buf, b.x, b.y);
        data.buffer = buf;
        Ok(())
    }

    fn data(&self, node: NodeId) -> Result<&NodeData, UiError> {
        self.taffy
            .get_node_context(node)
            .ok_or(UiError::UnknownNode(node))
    }

    fn data_mut(&mut self, node: NodeId) -> Result<&mut NodeData, UiError> {
        self.taffy
            .get_node_context_mut(node)
            .ok_or(UiError::UnknownNode(node))
    }

    fn invalidate(&mut self, node: NodeId) {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(data) = self.taffy.get_node_context_mut(n) {
                data.layout_valid = false;
            }
            cur = self.taffy.parent(n);
        }
    }

    fn invalidate_subtree(&mut self, node: NodeId) {
        for n in self.descendants(node) {
            if let Some(data) = self.taffy.get_node_context_mut(n) {
                data.layout_valid = false;
            }
        }
    }
}
