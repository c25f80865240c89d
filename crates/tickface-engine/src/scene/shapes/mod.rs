pub mod line;
pub mod rect;

pub use line::{LineCap, LineCmd};
pub use rect::RectCmd;
