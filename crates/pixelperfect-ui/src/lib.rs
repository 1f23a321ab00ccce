//! # Layout tree and widgets
//!
//! A display is a [`LayoutTree`] of nodes. Each node pairs a [`Widget`]
//! (what it draws) with a [`LayoutStyle`] (how flexbox places it) and owns a
//! private [`PixelBuffer`](pixelperfect_core::PixelBuffer) sized to its
//! computed box.
//!
//! A frame goes through three phases in [`LayoutTree::draw`]:
//!
//! 1. **prepare**: every attached widget pulls its data for the frame and may
//!    flag itself dirty or swap its children ([`Carousel`] does the latter).
//! 2. **layout**: if anything was flagged, taffy solves the whole tree once.
//! 3. **paint**: parents paint, children paint into their own buffers and
//!    are composited at their offsets.
//!
//! ```rust
//! use pixelperfect_core::{Color, PixelBuffer};
//! use pixelperfect_text::builtin_font;
//! use pixelperfect_ui::*;
//! use std::sync::Arc;
//!
//! let font = Arc::new(builtin_font());
//! let mut tree = LayoutTree::new();
//! let root = tree.insert(ContainerNode::new(), LayoutStyle::new().size(16.0, 8.0)).unwrap();
//! let label = tree.insert(TextNode::fixed(font, "HI"), LayoutStyle::new()).unwrap();
//! tree.add_child(root, label).unwrap();
//!
//! let mut frame = PixelBuffer::filled(16, 8, Color::BLACK);
//! tree.draw(root, &mut frame, &FrameContext::new(0.0, 0)).unwrap();
//! assert_eq!(tree.solve_count(), 1);
//! ```

pub mod bar_chart;
pub mod carousel;
pub mod container;
pub mod error;
pub mod icon;
pub mod style;
pub mod text_node;
pub mod tree;
pub mod tests;
pub mod widget;

pub use bar_chart::*;
pub use carousel::*;
pub use container::*;
pub use error::*;
pub use icon::*;
pub use style::*;
pub use text_node::*;
pub use tree::*;
pub use widget::*;

pub use taffy;
pub use taffy::NodeId;
