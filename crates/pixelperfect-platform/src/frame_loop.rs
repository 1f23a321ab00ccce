use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use pixelperfect_core::{Color, CurrentTimeResolver, PixelBuffer, Refresh};
use pixelperfect_devtools::Inspector;
use pixelperfect_ui::{FrameContext, LayoutTree, NodeId};
use tokio::task::LocalSet;
use tokio::time::MissedTickBehavior;
use web_time::Instant;

use crate::{DisplayConfig, DisplayControl, DisplaySink, DisplayState, PlatformError};

/// How long to sleep between data refreshes while the display is off.
pub const OFF_WAKE: Duration = Duration::from_secs(120);

/// Drives one display: refreshes data, draws the tree and presents frames.
///
/// Everything runs on one thread. [`FrameLoop::run`] sets up its own
/// [`LocalSet`]; refreshes are spawned onto it and finish between frames.
pub struct FrameLoop<S: DisplaySink> {
    config: DisplayConfig,
    tree: LayoutTree,
    root: NodeId,
    sink: S,
    time: Rc<CurrentTimeResolver>,
    resolvers: Vec<Rc<dyn Refresh>>,
    control: DisplayControl,
    inspector: Inspector,
    frame: PixelBuffer,
    frames: u64,
    blank: bool,
}

impl<S: DisplaySink> FrameLoop<S> {
    pub fn new(config: DisplayConfig, tree: LayoutTree, root: NodeId, sink: S, time: Rc<CurrentTimeResolver>) -> Self {
        let frame = PixelBuffer::filled(config.width, config.height, Color::BLACK);
        Self {
            config,
            tree,
            root,
            sink,
            time,
            resolvers: Vec::new(),
            control: DisplayControl::default(),
            inspector: Inspector::new(),
            frame,
            frames: 0,
            blank: false,
        }
    }

    /// Registers a resolver to be offered a refresh every tick.
    pub fn add_resolver<R: Refresh + 'static>(&mut self, resolver: Rc<R>) {
        self.resolvers.push(resolver);
    }

    pub fn with_control(mut self, control: DisplayControl) -> Self {
        self.control = control;
        self
    }

    pub fn control(&self) -> DisplayControl {
        self.control.clone()
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn inspector_mut(&mut self) -> &mut Inspector {
        &mut self.inspector
    }

    /// Toggles debug borders on the whole tree.
    pub fn toggle_inspector(&mut self) -> Result<(), PlatformError> {
        Ok(self.inspector.toggle(&mut self.tree, self.root)?)
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs until `shutdown` resolves. A layout error ends the loop.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<(), PlatformError> {
        let local = LocalSet::new();
        let res = local.run_until(self.run_local(shutdown)).await;
        // Dropping the set cancels refreshes still in flight.
        drop(local);
        match &res {
            Ok(()) => log::info!("frame loop stopped after {} frame(s)", self.frames),
            Err(e) => log::error!("frame loop failed: {e}"),
        }
        res
    }

    /// Builds a current-thread runtime and runs until Ctrl-C.
    pub fn run_blocking(&mut self) -> Result<(), PlatformError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(PlatformError::Runtime)?;
        rt.block_on(self.run(ctrl_c()))
    }

    async fn run_local(&mut self, shutdown: impl Future<Output = ()>) -> Result<(), PlatformError> {
        let mut ticker = tokio::time::interval(self.config.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut power = self.control.subscribe();
        tokio::pin!(shutdown);
        log::info!(
            "frame loop started: {}x{} every {:?}",
            self.config.width,
            self.config.height,
            self.config.tick
        );

        loop {
            let on = *power.borrow_and_update() == DisplayState::On;
            if on {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = ticker.tick() => {}
                }
            }
            self.tick()?;
            if !on {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = power.changed() => {}
                    _ = tokio::time::sleep(OFF_WAKE) => {}
                }
            }
        }
        Ok(())
    }

    /// One frame: offer refreshes, then draw and present if the display is on.
    ///
    /// Must be called from within a [`LocalSet`].
    pub fn tick(&mut self) -> Result<(), PlatformError> {
        self.time.freeze();
        let res = self.tick_frozen();
        self.time.release();
        res
    }

    fn tick_frozen(&mut self) -> Result<(), PlatformError> {
        let now = self.time.now();
        for resolver in &self.resolvers {
            let resolver = Rc::clone(resolver);
            tokio::task::spawn_local(async move { resolver.maybe_refresh(now).await });
        }

        if !self.control.is_on() {
            if !self.blank {
                self.sink.clear()?;
                self.blank = true;
            }
            return Ok(());
        }
        self.blank = false;

        let started = Instant::now();
        let ctx = FrameContext::new(now, self.frames);
        self.frame.ensure_size(self.config.size());
        self.frame.fill(Color::BLACK);
        self.tree.draw(self.root, &mut self.frame, &ctx)?;
        self.sink.present(&self.frame)?;
        self.frames += 1;
        self.inspector.frame(&mut self.tree, self.root)?;
        log::trace!("frame {} drawn in {:?}", ctx.frame, started.elapsed());
        Ok(())
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed it never resolves.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Ctrl-C received, shutting down"),
        Err(e) => {
            log::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
