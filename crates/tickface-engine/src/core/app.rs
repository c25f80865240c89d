use std::time::Instant;

use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// When the runtime should produce the next frame.
///
/// Returned from [`App::redraw_schedule`] each time the event loop is about to block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RedrawSchedule {
    /// Redraw on every loop iteration.
    Continuous,
    /// Content is dirty; redraw now, then ask again.
    Now,
    /// Nothing to draw; wake up at the given instant and ask again.
    At(Instant),
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called when the event loop is about to wait for new events.
    ///
    /// This is where time-driven state (timers, animations) advances. The default
    /// keeps redrawing every iteration.
    fn redraw_schedule(&mut self, now: Instant) -> RedrawSchedule {
        let _ = now;
        RedrawSchedule::Continuous
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
