use std::cell::Cell;
use std::rc::Rc;

use web_time::{SystemTime, UNIX_EPOCH};

/// Wall-clock source, in seconds since the Unix epoch.
pub trait Clock: 'static {
    fn now(&self) -> f64;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A clock you can drive deterministically. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    t: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(t: f64) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }
    pub fn set(&self, t: f64) {
        self.t.set(t);
    }
    pub fn advance(&self, dt: f64) {
        self.t.set(self.t.get() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.t.get()
    }
}
