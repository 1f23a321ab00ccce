use taffy::prelude::{auto, length, percent};
use taffy::style::{Dimension, Display, LengthPercentage, LengthPercentageAuto, Style};

pub use taffy::{AlignItems, AlignSelf, FlexDirection, JustifyContent};

/// A length along one axis: pixels, a fraction of the parent, or content-sized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Length {
    #[default]
    Auto,
    Px(f32),
    /// `0.0..=1.0` of the parent.
    Percent(f32),
}

impl Length {
    fn dimension(self) -> Dimension {
        match self {
            Length::Auto => auto(),
            Length::Px(v) => length(v.max(0.0)),
            Length::Percent(p) => percent(p.clamp(0.0, 1.0)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Edges {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Edges {
    pub fn all(v: f32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    fn padding(self) -> taffy::Rect<LengthPercentage> {
        taffy::Rect {
            left: length(self.left),
            right: length(self.right),
            top: length(self.top),
            bottom: length(self.bottom),
        }
    }

    fn margin(self) -> taffy::Rect<LengthPercentageAuto> {
        taffy::Rect {
            left: length(self.left),
            right: length(self.right),
            top: length(self.top),
            bottom: length(self.bottom),
        }
    }
}

/// Flex sizing hints attached to every node.
///
/// Unset fields take the display defaults: column direction, grow 1,
/// children stretched across the cross axis, content-sized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutStyle {
    pub flex_dir: Option<FlexDirection>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub align_items: Option<AlignItems>,
    pub align_self: Option<AlignSelf>,
    pub justify_content: Option<JustifyContent>,
    pub width: Length,
    pub height: Length,
    pub margin: Option<Edges>,
    pub padding: Option<Edges>,
}

impl LayoutStyle {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn row(mut self) -> Self {
        self.flex_dir = Some(FlexDirection::Row);
        self
    }
    pub fn column(mut self) -> Self {
        self.flex_dir = Some(FlexDirection::Column);
        self
    }
    pub fn flex_grow(mut self, v: f32) -> Self {
        self.flex_grow = Some(v);
        self
    }
    pub fn flex_shrink(mut self, v: f32) -> Self {
        self.flex_shrink = Some(v);
        self
    }
    pub fn align_items(mut self, a: AlignItems) -> Self {
        self.align_items = Some(a);
        self
    }
    pub fn align_self(mut self, a: AlignSelf) -> Self {
        self.align_self = Some(a);
        self
    }
    pub fn justify_content(mut self, j: JustifyContent) -> Self {
        self.justify_content = Some(j);
        self
    }
    /// Explicit size in pixels.
    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.width = Length::Px(w);
        self.height = Length::Px(h);
        self
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = Length::Px(w);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Length::Px(h);
        self
    }
    pub fn width_percent(mut self, p: f32) -> Self {
        self.width = Length::Percent(p);
        self
    }
    pub fn height_percent(mut self, p: f32) -> Self {
        self.height = Length::Percent(p);
        self
    }
    pub fn margin(mut self, v: f32) -> Self {
        self.margin = Some(Edges::all(v));
        self
    }
    pub fn margin_values(mut self, e: Edges) -> Self {
        self.margin = Some(e);
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(Edges::all(v));
        self
    }
    pub fn padding_values(mut self, e: Edges) -> Self {
        self.padding = Some(e);
        self
    }

    /// True when both axes have a pixel size, so the node never needs measuring.
    pub fn is_fixed_size(&self) -> bool {
        matches!((self.width, self.height), (Length::Px(_), Length::Px(_)))
    }
}

pub(crate) fn style_from_layout(l: &LayoutStyle) -> Style {
    let mut s = Style {
        display: Display::Flex,
        ..Default::default()
    };
    s.flex_direction = l.flex_dir.unwrap_or(FlexDirection::Column);
    s.flex_grow = l.flex_grow.unwrap_or(1.0);
    if let Some(sh) = l.flex_shrink {
        s.flex_shrink = sh;
    }
    s.align_items = Some(l.align_items.unwrap_or(AlignItems::Stretch));
    s.align_self = l.align_self;
    s.justify_content = Some(l.justify_content.unwrap_or(JustifyContent::FlexStart));
    s.size = taffy::Size {
        width: l.width.dimension(),
        height: l.height.dimension(),
    };
    if let Some(m) = l.margin {
        s.margin = m.margin();
    }
    if let Some(p) = l.padding {
        s.padding = p.padding();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_defaults() {
        let s = style_from_layout(&LayoutStyle::new());
        assert_eq!(s.flex_grow, 1.0);
        assert_eq!(s.align_items, Some(AlignItems::Stretch));
        assert_eq!(s.flex_direction, FlexDirection::Column);
        assert_eq!(s.size.width, Dimension::auto());
    }

    #[test]
    fn test_style_explicit() {
        let l = LayoutStyle::new().row().flex_grow(0.0).size(64.0, 32.0).padding(1.0);
        assert!(l.is_fixed_size());
        let s = style_from_layout(&l);
        assert_eq!(s.flex_direction, FlexDirection::Row);
        assert_eq!(s.flex_grow, 0.0);
        assert_eq!(s.size.width, Dimension::length(64.0));
        assert_eq!(s.padding.left, LengthPercentage::length(1.0));
    }
}
