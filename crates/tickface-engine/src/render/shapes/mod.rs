//! Shape renderers.

mod common;

pub mod line;
pub mod rect;

pub use line::LineRenderer;
pub use rect::RectRenderer;
