use pixelperfect_core::{Color, ComputedBox, PixelBuffer};
use taffy::AvailableSpace;

use crate::{FrameContext, PrepareContext, Widget};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Piecewise-linear color ramp over values, e.g. green at 0, yellow at 50,
/// red at 100.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorScale {
    stops: Vec<(f64, Color)>,
}

impl ColorScale {
    /// Stops are sorted by value.
    pub fn new(mut stops: Vec<(f64, Color)>) -> Self {
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    pub fn solid(color: Color) -> Self {
        Self::new(vec![(0.0, color)])
    }

    pub fn color_at(&self, value: f64) -> Color {
        let Some(&(first_v, first_c)) = self.stops.first() else {
            return Color::WHITE;
        };
        if value <= first_v {
            return first_c;
        }
        let mut prev = (first_v, first_c);
        for &(v, c) in &self.stops[1..] {
            if value <= v {
                if value == v {
                    return c;
                }
                let t = (value - prev.0) / (v - prev.0);
                return prev.1.lerp(c, t as f32);
            }
            prev = (v, c);
        }
        prev.1
    }
}

pub type ValueSource = Box<dyn Fn(&FrameContext) -> Option<f64>>;

/// A fill bar showing a value within `[min, max]`, colored along a
/// [`ColorScale`]. No value means an empty bar.
pub struct BarChart {
    orientation: Orientation,
    min: f64,
    max: f64,
    source: ValueSource,
    value: Option<f64>,
    scale: ColorScale,
    border: u32,
    border_color: Color,
    background: Color,
}

impl BarChart {
    pub fn new(
        orientation: Orientation,
        min: f64,
        max: f64,
        source: impl Fn(&FrameContext) -> Option<f64> + 'static,
    ) -> Self {
        Self {
            orientation,
            min,
            max,
            source: Box::new(source),
            value: None,
            scale: ColorScale::solid(Color::WHITE),
            border: 0,
            border_color: Color::BLACK,
            background: Color::BLACK,
        }
    }

    pub fn scale(mut self, scale: ColorScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn border(mut self, width: u32, color: Color) -> Self {
        self.border = width;
        self.border_color = color;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Widget for BarChart {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) {
        self.value = (self.source)(cx.frame());
    }

    // Bars take whatever space the layout hands them.
    fn measure(
        &mut self,
        _known: taffy::Size<Option<f32>>,
        _available: taffy::Size<AvailableSpace>,
    ) -> Option<taffy::Size<f32>> {
        Some(taffy::Size::ZERO)
    }

    fn paint(&mut self, buf: &mut PixelBuffer, _ctx: &FrameContext) {
        buf.fill(self.background);
        for i in 0..self.border {
            let rect = ComputedBox::new(
                i as i32,
                i as i32,
                buf.width().saturating_sub(2 * i),
                buf.height().saturating_sub(2 * i),
            );
            buf.stroke_rect(rect, self.border_color);
        }

        let Some(value) = self.value else {
            return;
        };
        let inner = ComputedBox::new(
            self.border as i32,
            self.border as i32,
            buf.width().saturating_sub(2 * self.border),
            buf.height().saturating_sub(2 * self.border),
        );
        let span = self.max - self.min;
        match self.orientation {
            Orientation::Horizontal => {
                for x in 0..inner.width {
                    let at = self.min + (x as f64 / inner.width as f64) * span;
                    if at > value {
                        break;
                    }
                    let col = ComputedBox::new(inner.x + x as i32, inner.y, 1, inner.height);
                    buf.fill_rect(col, self.scale.color_at(at));
                }
            }
            Orientation::Vertical => {
                for y in 0..inner.height {
                    let at = self.min + (y as f64 / inner.height as f64) * span;
                    if at > value {
                        break;
                    }
                    let row_y = inner.y + (inner.height - 1 - y) as i32;
                    let row = ComputedBox::new(inner.x, row_y, inner.width, 1);
                    buf.fill_rect(row, self.scale.color_at(at));
                }
            }
        }
    }

    fn debug_name(&self) -> &'static str {
        "bar_chart"
    }
}
