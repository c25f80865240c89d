//! Analog clock face hosted on the tickface engine.
//!
//! The face itself ([`ClockFace`]) is plain state: it is handed ticks and
//! animation progress by a [`FaceScheduler`] and paints into a `DrawList`.
//! [`ClockApp`] glues both onto the engine runtime.

pub mod angle;
pub mod animation;
pub mod app;
pub mod config;
pub mod face;
pub mod scheduler;

pub use angle::{ClockAngles, TRIG_MAX_ANGLE};
pub use animation::{Animation, AnimationCurve, AnimationProgress, ANIMATION_NORMALIZED_MAX};
pub use app::ClockApp;
pub use config::FaceConfig;
pub use face::{ClockFace, FaceLayout, HandSegment};
pub use scheduler::{FaceHandlers, FaceScheduler, LocalClock, TickService, TimeSource, WallTime};
