//! Rotating between panels that compete for the same screen region.
//!
//! Each frame the carousel asks every registered [`Panel`] whether it wants
//! to be shown, groups the willing ones by priority and keeps only the
//! highest group. Within that group the wall clock picks one:
//! `floor(now / time_per_slice) mod len`. Nothing about the rotation is
//! remembered between frames, so the choice is a pure function of the time
//! and the eligible set, and a change in the set can jump straight to a
//! different panel.

use pixelperfect_core::{Color, PixelBuffer};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use taffy::{AvailableSpace, NodeId};

use crate::{FrameContext, PrepareContext, Widget};

pub const DEFAULT_TIME_PER_SLICE: f64 = 5.0;

new_key_type! {
    pub struct PanelId;
}

/// A candidate for a carousel slot. The drawable subtree lives in the
/// [`LayoutTree`](crate::LayoutTree); the panel only points at it.
pub trait Panel {
    fn is_visible(&self, _ctx: &FrameContext) -> bool {
        true
    }

    /// Higher wins; panels with a lower priority are hidden while any
    /// higher-priority panel is visible.
    fn priority(&self, _ctx: &FrameContext) -> f64 {
        0.0
    }

    fn drawable(&self) -> NodeId;
}

type Predicate = Box<dyn Fn(&FrameContext) -> bool>;
type Priority = Box<dyn Fn(&FrameContext) -> f64>;

/// A [`Panel`] assembled from closures.
pub struct ClosurePanel {
    drawable: NodeId,
    visible: Option<Predicate>,
    priority: Option<Priority>,
}

impl ClosurePanel {
    /// Always visible, priority 0.
    pub fn new(drawable: NodeId) -> Self {
        Self {
            drawable,
            visible: None,
            priority: None,
        }
    }

    pub fn visible_when(mut self, f: impl Fn(&FrameContext) -> bool + 'static) -> Self {
        self.visible = Some(Box::new(f));
        self
    }

    pub fn priority(mut self, f: impl Fn(&FrameContext) -> f64 + 'static) -> Self {
        self.priority = Some(Box::new(f));
        self
    }
}

impl Panel for ClosurePanel {
    fn is_visible(&self, ctx: &FrameContext) -> bool {
        self.visible.as_ref().is_none_or(|f| f(ctx))
    }

    fn priority(&self, ctx: &FrameContext) -> f64 {
        self.priority.as_ref().map_or(0.0, |f| f(ctx))
    }

    fn drawable(&self) -> NodeId {
        self.drawable
    }
}

/// Picks one of the eligible candidates, given as `(index, priority)` pairs
/// in registration order. Returns the chosen index. A NaN priority counts
/// as 0.
pub fn select_panel(eligible: &[(usize, f64)], now: f64, time_per_slice: f64) -> Option<usize> {
    let class = |p: f64| if p.is_nan() { 0.0 } else { p };
    let top = eligible
        .iter()
        .map(|&(_, p)| class(p))
        .max_by(|a, b| a.total_cmp(b))?;
    let bucket: SmallVec<[usize; 8]> = eligible
        .iter()
        .filter(|&&(_, p)| class(p) == top)
        .map(|&(i, _)| i)
        .collect();
    match bucket.len() {
        0 => return None,
        1 => return Some(bucket[0]),
        _ => {}
    }
    let slice = if time_per_slice > 0.0 {
        (now / time_per_slice).floor() as i64
    } else {
        0
    };
    Some(bucket[slice.rem_euclid(bucket.len() as i64) as usize])
}

/// A widget that shows at most one panel's drawable as its only child.
pub struct Carousel {
    panels: SlotMap<PanelId, Box<dyn Panel>>,
    order: Vec<PanelId>,
    time_per_slice: f64,
    background: Color,
    active: Option<(PanelId, NodeId)>,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new()
    }
}

impl Carousel {
    pub fn new() -> Self {
        Self {
            panels: SlotMap::with_key(),
            order: Vec::new(),
            time_per_slice: DEFAULT_TIME_PER_SLICE,
            background: Color::BLACK,
            active: None,
        }
    }

    pub fn time_per_slice(mut self, seconds: f64) -> Self {
        self.time_per_slice = seconds;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_panel(mut self, panel: impl Panel + 'static) -> Self {
        self.add_panel(panel);
        self
    }

    pub fn add_panel(&mut self, panel: impl Panel + 'static) -> PanelId {
        let id = self.panels.insert(Box::new(panel));
        self.order.push(id);
        id
    }

    /// Unregisters a panel. If it is showing it is detached on the next frame.
    pub fn remove_panel(&mut self, id: PanelId) -> Option<Box<dyn Panel>> {
        self.order.retain(|&p| p != id);
        self.panels.remove(id)
    }

    pub fn panel_count(&self) -> usize {
        self.order.len()
    }

    /// The panel currently attached, if any.
    pub fn active_panel(&self) -> Option<PanelId> {
        self.active.map(|(p, _)| p)
    }

    pub fn active_drawable(&self) -> Option<NodeId> {
        self.active.map(|(_, n)| n)
    }

    /// Evaluates every panel once against `ctx` and picks one.
    pub fn choose(&self, ctx: &FrameContext) -> Option<PanelId> {
        let eligible: SmallVec<[(usize, f64); 8]> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let panel = self.panels.get(*id)?;
                if !panel.is_visible(ctx) {
                    return None;
                }
                let priority = panel.priority(ctx);
                if priority.is_nan() {
                    log::warn!("carousel panel {id:?} reported a NaN priority; using 0");
                }
                Some((i, priority))
            })
            .collect();
        select_panel(&eligible, ctx.now, self.time_per_slice).map(|i| self.order[i])
    }
}

impl Widget for Carousel {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) {
        let chosen = self
            .choose(cx.frame())
            .and_then(|id| self.panels.get(id).map(|p| (id, p.drawable())));
        let current: Option<NodeId> = cx.children().first().copied();
        if chosen.map(|(_, n)| n) != current || cx.children().len() > 1 {
            log::debug!(
                "carousel {:?}: {:?} -> {:?}",
                cx.node(),
                current,
                chosen.map(|(_, n)| n)
            );
            cx.set_children(chosen.map(|(_, n)| n).into_iter().collect());
        }
        self.active = chosen;
    }

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
        "carousel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_empty() {
        assert_eq!(select_panel(&[], 12.0, 5.0), None);
    }

    #[test]
    fn test_select_same_slice_is_stable() {
        let eligible = [(0, 0.0), (1, 0.0), (2, 0.0)];
        assert_eq!(select_panel(&eligible, 12.0, 5.0), select_panel(&eligible, 13.0, 5.0));
        assert_ne!(select_panel(&eligible, 13.0, 5.0), select_panel(&eligible, 17.0, 5.0));
    }

    #[test]
    fn test_select_priority_preempts() {
        let eligible = [(0, 0.0), (1, 10.0), (2, 0.0)];
        for t in 0..60 {
            assert_eq!(select_panel(&eligible, t as f64, 5.0), Some(1));
        }
    }

    #[test]
    fn test_select_two_panels_rotate() {
        let eligible = [(0, 0.0), (1, 0.0)];
        for t in 0..15 {
            let expected = if (5..10).contains(&t) { 1 } else { 0 };
            assert_eq!(select_panel(&eligible, t as f64, 5.0), Some(expected), "t={t}");
        }
    }

    #[test]
    fn test_select_single_panel_ignores_time() {
        let eligible = [(3, -1.0)];
        for t in [0.0, 4.9, 5.0, 1234.5] {
            assert_eq!(select_panel(&eligible, t, 5.0), Some(3));
        }
    }

    #[test]
    fn test_select_nan_priority_counts_as_zero() {
        let eligible = [(0, 0.0), (1, f64::NAN)];
        assert_eq!(select_panel(&eligible, 12.0, 5.0), Some(0));
        assert_eq!(select_panel(&eligible, 7.0, 5.0), Some(1));
        assert_eq!(select_panel(&[(4, f64::NAN)], 12.0, 5.0), Some(4));
        assert_eq!(select_panel(&[(0, f64::NAN), (1, 2.0)], 12.0, 5.0), Some(1));
    }

    #[test]
    fn test_choose_survives_nan_priority() {
        let mut c = Carousel::new();
        c.add_panel(ClosurePanel::new(NodeId::from(1u64)).priority(|_| f64::NAN));
        let b = c.add_panel(ClosurePanel::new(NodeId::from(2u64)).priority(|_| 1.0));
        assert_eq!(c.choose(&FrameContext::new(12.0, 0)), Some(b));
    }

    #[test]
    fn test_closure_panel_defaults() {
        let panel = ClosurePanel::new(NodeId::from(7u64));
        let ctx = FrameContext::default();
        assert!(panel.is_visible(&ctx));
        assert_eq!(Panel::priority(&panel, &ctx), 0.0);
        assert_eq!(panel.drawable(), NodeId::from(7u64));
    }

    #[test]
    fn test_choose_skips_invisible_and_removed() {
        let mut c = Carousel::new();
        let a = c.add_panel(ClosurePanel::new(NodeId::from(1u64)).visible_when(|_| false));
        let b = c.add_panel(ClosurePanel::new(NodeId::from(2u64)));
        let ctx = FrameContext::new(0.0, 0);
        assert_eq!(c.choose(&ctx), Some(b));
        c.remove_panel(b);
        assert_eq!(c.choose(&ctx), None);
        assert!(c.remove_panel(a).is_some());
        assert_eq!(c.panel_count(), 0);
    }
}
