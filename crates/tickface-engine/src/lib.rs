//! tickface engine crate.
//!
//! Owns the platform + GPU runtime pieces the clock face is hosted on:
//! window and event loop, surface, frame timing, keyboard input, the draw list
//! and the shape renderers.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
