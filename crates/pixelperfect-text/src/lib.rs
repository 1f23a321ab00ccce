//! Bitmap text for pixel matrices.
//!
//! Fonts are monospace BDF bitmaps: every glyph advances the pen by the
//! same number of pixels and every line has the same height, so measuring a
//! string is arithmetic and wrapping never needs shaping.
//!
//! ```rust
//! use pixelperfect_text::*;
//!
//! let font = builtin_font();
//! let wrapped = wrap(&font, "SUN 12 OCT", 24);
//! assert_eq!(wrapped.lines, vec!["SUN 12", "OCT"]);
//! ```

pub mod builtin;
pub mod draw;
pub mod error;
pub mod font;
pub mod registry;
pub mod wrap;

pub use builtin::*;
pub use draw::*;
pub use error::*;
pub use font::*;
pub use registry::*;
pub use wrap::*;
