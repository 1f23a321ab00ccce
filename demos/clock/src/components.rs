use std::rc::Rc;
use std::sync::Arc;

use pixelperfect_core::{Clock, Color, ComputedBox, DataResolver, PixelBuffer, ScheduledResolver, SystemClock};
use pixelperfect_text::BitmapFont;
use pixelperfect_ui::taffy::{self, AvailableSpace};
use pixelperfect_ui::{ClosurePanel, FrameContext, NodeId, PrepareContext, TextNode, Widget};

use crate::wall::WallTime;

/// How long a door must stay open before the alert takes over.
pub const DOOR_ALERT_AFTER: f64 = 300.0;
pub const DOOR_PRIORITY: f64 = 10.0;

/// Text whose color cycles through the hues with the clock.
pub struct RainbowText {
    inner: TextNode,
}

impl RainbowText {
    pub fn new(inner: TextNode) -> Self {
        Self { inner }
    }
}

pub fn hue_color(now: f64) -> Color {
    Color::from_hsl((now * 50.0).rem_euclid(360.0) as f32, 1.0, 0.5)
}

impl Widget for RainbowText {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) {
        self.inner.set_color(hue_color(cx.now()));
        self.inner.prepare(cx);
    }

    fn measure(
        &mut self,
        known: taffy::Size<Option<f32>>,
        available: taffy::Size<AvailableSpace>,
    ) -> Option<taffy::Size<f32>> {
        self.inner.measure(known, available)
    }

    fn paint(&mut self, buf: &mut PixelBuffer, ctx: &FrameContext) {
        self.inner.paint(buf, ctx);
    }

    fn debug_name(&self) -> &'static str {
        "rainbow_text"
    }
}

/// `3:04`; the colon blinks off on even seconds.
pub fn time_text(now: f64, utc_offset_minutes: i32) -> String {
    let text = WallTime::from_epoch(now, utc_offset_minutes).hm_12h();
    if (now.floor() as i64).rem_euclid(2) == 0 {
        text.replace(':', " ")
    } else {
        text
    }
}

pub fn time_face(font: Arc<BitmapFont>, utc_offset_minutes: i32) -> RainbowText {
    RainbowText::new(TextNode::new(font, move |ctx| time_text(ctx.now, utc_offset_minutes)))
}

pub fn day_of_week(font: Arc<BitmapFont>, utc_offset_minutes: i32) -> RainbowText {
    RainbowText::new(TextNode::new(font, move |ctx| {
        let t = WallTime::from_epoch(ctx.now, utc_offset_minutes);
        format!("{} {} {}", t.weekday_name(), t.month_name(), t.day)
    }))
}

pub fn labeled_time(font: Arc<BitmapFont>, label: impl Into<String>, utc_offset_minutes: i32) -> TextNode {
    let label = label.into();
    TextNode::new(font, move |ctx| {
        let t = WallTime::from_epoch(ctx.now, utc_offset_minutes);
        format!("{label}: {}{}", t.hm_12h(), t.am_pm())
    })
    .background(Color::from_rgb(16, 0, 16))
    .color(Color::from_rgb(0, 128, 0))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorInfo {
    pub open: bool,
    /// When the door last changed state, in Unix seconds.
    pub since: f64,
}

pub fn door_alert_due(info: Option<DoorInfo>, now: f64) -> bool {
    info.is_some_and(|d| d.open && now - d.since >= DOOR_ALERT_AFTER)
}

/// A carousel panel that preempts everything while the door has been open
/// for a while.
pub fn door_panel(drawable: NodeId, door: Rc<dyn DataResolver<DoorInfo>>) -> ClosurePanel {
    let visible = door.clone();
    ClosurePanel::new(drawable)
        .visible_when(move |ctx| door_alert_due(visible.value(), ctx.now))
        .priority(move |ctx| {
            if door_alert_due(door.value(), ctx.now) {
                DOOR_PRIORITY
            } else {
                0.0
            }
        })
}

/// Stand-in for a real door sensor: open for the second half of every
/// twenty minutes.
pub fn simulated_door_at(now: f64) -> DoorInfo {
    const WINDOW: f64 = 1200.0;
    let phase = now.rem_euclid(WINDOW);
    let open = phase >= WINDOW / 2.0;
    let since = now - phase + if open { WINDOW / 2.0 } else { 0.0 };
    DoorInfo { open, since }
}

pub fn simulated_door() -> ScheduledResolver<DoorInfo> {
    ScheduledResolver::new("door", 5.0, || async { anyhow::Ok(simulated_door_at(SystemClock.now())) })
}

/// Drawn when no `garage.png` is available.
pub fn garage_icon() -> PixelBuffer {
    let mut icon = PixelBuffer::new(9, 8);
    let roof = Color::from_rgb(200, 200, 200);
    for i in 0..5i32 {
        icon.fill_rect(ComputedBox::new(4 - i, i, (2 * i + 1) as u32, 1), roof);
    }
    icon.fill_rect(ComputedBox::new(1, 5, 7, 3), Color::from_rgb(255, 128, 0));
    icon
}
