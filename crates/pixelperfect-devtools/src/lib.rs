use web_time::Instant;

use pixelperfect_core::Color;
use pixelperfect_ui::{LayoutTree, NodeId, UiError};

pub const DEFAULT_LOG_EVERY: u64 = 100;

/// Frame statistics, summarized to the log every `log_every` frames.
pub struct Hud {
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    log_every: u64,
    solves_at_last_log: u64,
    pub metrics: Metrics,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            log_every: DEFAULT_LOG_EVERY,
            solves_at_last_log: 0,
            metrics: Metrics::default(),
        }
    }

    pub fn log_every(mut self, frames: u64) -> Self {
        self.log_every = frames.max(1);
        self
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    /// Records a presented frame.
    pub fn record(&mut self, tree: &LayoutTree) {
        self.record_at(Instant::now(), tree.solve_count());
    }

    pub fn record_at(&mut self, now: Instant, solves: u64) {
        self.frame_count += 1;
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
        self.metrics.solves = solves;

        if self.frame_count % self.log_every == 0 {
            log::debug!("{}", self.summary());
            self.solves_at_last_log = solves;
        }
    }

    pub fn summary(&self) -> String {
        let lines = [
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
            format!("solves: {}", self.metrics.solves),
            format!(
                "solves since last: {}",
                self.metrics.solves.saturating_sub(self.solves_at_last_log)
            ),
        ];
        lines.join("  |  ")
    }
}

#[derive(Clone, Debug, Default)]
pub struct Metrics {
    pub solves: u64,
}

/// Outlines every attached node while enabled.
pub struct Inspector {
    pub hud: Hud,
    enabled: bool,
    color: Color,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            hud: Hud::new(),
            enabled: false,
            color: Color::from_hex("#44AAFF"),
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flips the borders on or off for everything under `root`.
    pub fn toggle(&mut self, tree: &mut LayoutTree, root: NodeId) -> Result<(), UiError> {
        self.enabled = !self.enabled;
        let border = self.enabled.then_some(self.color);
        for node in tree.descendants(root) {
            tree.set_debug_border(node, border)?;
        }
        log::info!("inspector {}", if self.enabled { "on" } else { "off" });
        Ok(())
    }

    /// Call after each draw. Outlines nodes attached since the last frame
    /// and feeds the HUD.
    pub fn frame(&mut self, tree: &mut LayoutTree, root: NodeId) -> Result<(), UiError> {
        self.hud.record(tree);
        if self.enabled {
            for node in tree.descendants(root) {
                if tree.debug_border(node)?.is_none() {
                    tree.set_debug_border(node, Some(self.color))?;
                }
            }
        }
        Ok(())
    }
}
