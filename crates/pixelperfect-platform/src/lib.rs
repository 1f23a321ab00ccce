//! Frame loop and display sinks.
//!
//! The loop runs on a tokio current-thread runtime: data resolvers refresh
//! as local tasks between frames, and each tick draws the layout tree into a
//! [`PixelBuffer`](pixelperfect_core::PixelBuffer) handed to a
//! [`DisplaySink`]. Real matrix hardware is not driven from here; the
//! [`AnsiSink`] emulates it in a terminal.

pub mod config;
pub mod control;
pub mod error;
pub mod frame_loop;
pub mod sink;

pub use config::*;
pub use control::*;
pub use error::*;
pub use frame_loop::*;
pub use sink::*;
