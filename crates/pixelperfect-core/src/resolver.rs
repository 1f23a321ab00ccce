//! # Data resolvers
//!
//! A resolver holds the latest known value of some external fact (the time,
//! the weather, whether the garage door is open) as a snapshot that readers
//! can consult synchronously from the draw path:
//!
//! ```rust
//! use pixelperfect_core::*;
//!
//! let door = StaticResolver::new("closed".to_string());
//! assert_eq!(door.value().as_deref(), Some("closed"));
//! ```
//!
//! `None` always means "unknown"; readers never wait for a value.
//!
//! ## Scheduled refresh
//!
//! [`ScheduledResolver`] wraps an async collector and refreshes it from the
//! frame loop. Every tick the loop calls `maybe_refresh(now)` on each
//! resolver; a refresh starts only if the (jittered) interval has elapsed
//! since the last completed refresh and no refresh of the same resolver is
//! already running. A failed collection clears the snapshot and is logged,
//! never returned to the caller.
//!
//! The effective interval is `interval * jitter` with `jitter` drawn once
//! from `[1.0, 1.2)`, so resolvers created together drift apart and no
//! resolver refreshes more often than requested.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Clock;

/// Upper bound (exclusive) of the jitter factor.
pub const MAX_JITTER: f64 = 1.2;

pub type RefreshFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;
pub type CollectFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>>>>;

/// The part of a resolver the frame loop drives.
pub trait Refresh {
    /// Starts a refresh if one is due. Never fails; never queues.
    fn maybe_refresh(&self, now: f64) -> RefreshFuture<'_>;
}

pub trait DataResolver<T>: Refresh {
    /// Current snapshot; `None` means unknown.
    fn value(&self) -> Option<T>;
}

impl<R: Refresh + ?Sized> Refresh for Rc<R> {
    fn maybe_refresh(&self, now: f64) -> RefreshFuture<'_> {
        (**self).maybe_refresh(now)
    }
}

impl<T, R: DataResolver<T> + ?Sized> DataResolver<T> for Rc<R> {
    fn value(&self) -> Option<T> {
        (**self).value()
    }
}

/// A resolver whose value is supplied by the caller; refreshing does nothing.
pub struct StaticResolver<T> {
    value: RefCell<Option<T>>,
}

impl<T> StaticResolver<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(Some(value)),
        }
    }

    pub fn empty() -> Self {
        Self {
            value: RefCell::new(None),
        }
    }

    /// Replaces the value wholesale.
    pub fn replace(&self, value: Option<T>) {
        *self.value.borrow_mut() = value;
    }
}

impl<T> Refresh for StaticResolver<T> {
    fn maybe_refresh(&self, _now: f64) -> RefreshFuture<'_> {
        Box::pin(async {})
    }
}

impl<T: Clone> DataResolver<T> for StaticResolver<T> {
    fn value(&self) -> Option<T> {
        self.value.borrow().clone()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefreshPolicy {
    interval: f64,
    jitter: f64,
}

impl RefreshPolicy {
    /// Nominal interval in seconds, with a random jitter factor.
    pub fn new(interval: f64) -> Self {
        Self::with_jitter(interval, random_jitter())
    }

    /// Explicit jitter factor, clamped into `[1.0, MAX_JITTER)`.
    pub fn with_jitter(interval: f64, jitter: f64) -> Self {
        let jitter = if jitter.is_nan() {
            1.0
        } else {
            jitter.clamp(1.0, MAX_JITTER - f64::EPSILON)
        };
        Self {
            interval: interval.max(0.0),
            jitter,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn effective_interval(&self) -> f64 {
        self.interval * self.jitter
    }

    /// A resolver that has never refreshed is always due.
    pub fn is_due(&self, last_refresh: Option<f64>, now: f64) -> bool {
        match last_refresh {
            None => true,
            Some(last) => now - last > self.effective_interval(),
        }
    }
}

fn random_jitter() -> f64 {
    match getrandom::u32() {
        Ok(r) => 1.0 + (r as f64 / (u32::MAX as f64 + 1.0)) * (MAX_JITTER - 1.0),
        Err(e) => {
            log::warn!("no randomness for refresh jitter ({e}); using midpoint");
            1.0 + (MAX_JITTER - 1.0) / 2.0
        }
    }
}

/// Holds the in-flight flag for the lifetime of one refresh.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A resolver refreshed from an async collector on a jittered schedule.
pub struct ScheduledResolver<T> {
    name: String,
    policy: RefreshPolicy,
    collector: Box<dyn Fn() -> CollectFuture<T>>,
    snapshot: RefCell<Option<Rc<T>>>,
    last_refresh: Cell<Option<f64>>,
    in_flight: AtomicBool,
    refreshes: Cell<u64>,
}

impl<T: 'static> ScheduledResolver<T> {
    pub fn new<F, Fut>(name: impl Into<String>, interval: f64, collector: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<T>> + 'static,
    {
        Self::with_policy(name, RefreshPolicy::new(interval), collector)
    }

    pub fn with_policy<F, Fut>(name: impl Into<String>, policy: RefreshPolicy, collector: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<T>> + 'static,
    {
        Self {
            name: name.into(),
            policy,
            collector: Box::new(move || Box::pin(collector()) as CollectFuture<T>),
            snapshot: RefCell::new(None),
            last_refresh: Cell::new(None),
            in_flight: AtomicBool::new(false),
            refreshes: Cell::new(0),
        }
    }
}

impl<T> ScheduledResolver<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Tick time of the last completed refresh, successful or not.
    pub fn last_refresh(&self) -> Option<f64> {
        self.last_refresh.get()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of collections started so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.get()
    }

    /// Shared handle to the current snapshot, without cloning the value.
    pub fn snapshot(&self) -> Option<Rc<T>> {
        self.snapshot.borrow().clone()
    }

    async fn refresh(&self, now: f64) {
        self.refreshes.set(self.refreshes.get() + 1);
        let next = match (self.collector)().await {
            Ok(value) => Some(Rc::new(value)),
            Err(e) => {
                log::warn!("{}: collection failed: {e:#}", self.name);
                None
            }
        };
        *self.snapshot.borrow_mut() = next;
        self.last_refresh.set(Some(now));
    }
}

impl<T> Refresh for ScheduledResolver<T> {
    fn maybe_refresh(&self, now: f64) -> RefreshFuture<'_> {
        Box::pin(async move {
            if !self.policy.is_due(self.last_refresh.get(), now) {
                return;
            }
            let Some(_guard) = InFlight::try_acquire(&self.in_flight) else {
                log::trace!("{}: refresh already in flight; skipping", self.name);
                return;
            };
            self.refresh(now).await;
        })
    }
}

impl<T: Clone> DataResolver<T> for ScheduledResolver<T> {
    fn value(&self) -> Option<T> {
        self.snapshot.borrow().as_deref().cloned()
    }
}

/// The wall-clock time as a resolver.
///
/// The frame loop freezes it for the duration of a frame so that every
/// component drawn in that frame sees the same instant.
pub struct CurrentTimeResolver {
    clock: Box<dyn Clock>,
    frozen: Cell<Option<f64>>,
}

impl CurrentTimeResolver {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            clock: Box::new(clock),
            frozen: Cell::new(None),
        }
    }

    pub fn now(&self) -> f64 {
        self.frozen.get().unwrap_or_else(|| self.clock.now())
    }

    pub fn freeze(&self) {
        self.frozen.set(Some(self.clock.now()));
    }

    pub fn release(&self) {
        self.frozen.set(None);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get().is_some()
    }
}

impl Refresh for CurrentTimeResolver {
    fn maybe_refresh(&self, _now: f64) -> RefreshFuture<'_> {
        Box::pin(async {})
    }
}

impl DataResolver<f64> for CurrentTimeResolver {
    fn value(&self) -> Option<f64> {
        Some(self.now())
    }
}
