//! # Pixel buffers, clocks and data snapshots
//!
//! The core crate has no layout and no fonts. It carries the pieces every
//! other crate shares:
//!
//! - [`PixelBuffer`] and [`Color`]: the RGBA raster each node draws into, and
//!   the final frame handed to a display.
//! - [`ComputedBox`], [`Size`], [`Point`]: whole-pixel geometry.
//! - [`Clock`]: the source of "now" for the frame loop, with a
//!   [`ManualClock`] for tests.
//! - [`DataResolver`] and friends: cached snapshots of external data,
//!   refreshed on a jittered schedule without ever blocking a frame.
//!
//! ```rust
//! use pixelperfect_core::*;
//!
//! let mut frame = PixelBuffer::filled(4, 2, Color::BLACK);
//! let mut dot = PixelBuffer::new(1, 1);
//! dot.set(0, 0, Color::WHITE);
//! frame.composite(&dot, 3, 1);
//! assert_eq!(frame.get(3, 1), Some(Color::WHITE));
//! ```

pub mod buffer;
pub mod clock;
pub mod color;
pub mod error;
pub mod geometry;
pub mod resolver;

pub use buffer::*;
pub use clock::*;
pub use color::*;
pub use error::*;
pub use geometry::*;
pub use resolver::*;
