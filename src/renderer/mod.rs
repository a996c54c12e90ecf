//! SVG renderer for resolved diagrams
//!
//! [`SvgPainter`] implements the layout [`Painter`](crate::layout::Painter)
//! trait; [`render_svg`] wraps its output in a complete document.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, SvgPainter};
