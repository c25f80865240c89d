use std::time::Instant;

use tickface_engine::coords::{Rect, Vec2};
use tickface_engine::core::{App as EngineApp, AppControl, FrameCtx, FrameStatus, RedrawSchedule};
use tickface_engine::input::{Button, InputFrame};
use tickface_engine::render::shapes::{LineRenderer, RectRenderer};
use tickface_engine::scene::DrawList;

use crate::config::FaceConfig;
use crate::face::ClockFace;
use crate::scheduler::{FaceScheduler, LocalClock, TimeSource};

/// The clock face as an engine application.
///
/// Time-driven state advances in [`redraw_schedule`](EngineApp::redraw_schedule);
/// frames are only produced when the face is dirty or input arrived.
pub struct ClockApp<T: TimeSource = LocalClock> {
    face: ClockFace,
    scheduler: FaceScheduler<T>,
    started: bool,
    /// Simulated quick-view overlay covering the bottom of the display.
    peek: bool,

    draw_list: DrawList,
    rect_renderer: RectRenderer,
    line_renderer: LineRenderer,
}

impl ClockApp<LocalClock> {
    pub fn new(config: FaceConfig) -> Self {
        Self::with_time_source(config, LocalClock)
    }
}

impl<T: TimeSource> ClockApp<T> {
    pub fn with_time_source(config: FaceConfig, source: T) -> Self {
        let scheduler = FaceScheduler::new(source, config.frame_interval);
        Self {
            face: ClockFace::new(config),
            scheduler,
            started: false,
            peek: false,
            draw_list: DrawList::new(),
            rect_renderer: RectRenderer::new(),
            line_renderer: LineRenderer::new(),
        }
    }

    pub fn face(&self) -> &ClockFace {
        &self.face
    }

    fn unobstructed(&self, bounds: Rect) -> Option<Rect> {
        self.peek.then(|| {
            let visible = (bounds.size.y - self.face.config().peek_height).max(0.0);
            Rect::from_origin_size(bounds.origin, Vec2::new(bounds.size.x, visible))
        })
    }

    /// Back closes the face; Select toggles the quick-view overlay.
    fn handle_buttons(&mut self, input: &InputFrame) -> AppControl {
        if input.button_pressed(Button::Back) {
            log::debug!("back pressed, closing face");
            return AppControl::Exit;
        }
        if input.button_pressed(Button::Select) {
            self.peek = !self.peek;
            self.face.mark_dirty();
            log::debug!("quick view {}", if self.peek { "shown" } else { "hidden" });
        }
        AppControl::Continue
    }

    /// The face stays dirty until a frame actually reaches the screen.
    fn finish_frame(&mut self, status: FrameStatus) -> AppControl {
        match status {
            FrameStatus::Presented => {
                self.face.take_dirty();
                AppControl::Continue
            }
            FrameStatus::Skipped => AppControl::Continue,
            FrameStatus::Lost => AppControl::Exit,
        }
    }

    fn advance(&mut self, now: Instant) -> RedrawSchedule {
        if !self.started {
            self.scheduler.start(&mut self.face, now);
            self.started = true;
        } else {
            self.scheduler.poll(&mut self.face, now);
        }

        if self.face.is_dirty() {
            RedrawSchedule::Now
        } else {
            RedrawSchedule::At(self.scheduler.next_wake(now))
        }
    }
}

impl<T: TimeSource + 'static> EngineApp for ClockApp<T> {
    fn redraw_schedule(&mut self, now: Instant) -> RedrawSchedule {
        self.advance(now)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_buttons(ctx.input_frame) == AppControl::Exit {
            ctx.runtime.close_window(ctx.window.id);
            return AppControl::Continue;
        }

        let bounds = ctx.window.bounds();
        let unobstructed = self.unobstructed(bounds);

        self.draw_list.clear();
        self.draw_list.push_clip(bounds);
        self.face.draw(bounds, unobstructed, &mut self.draw_list);
        self.draw_list.pop_clip();

        log::trace!(
            "frame {} (dt {:.1} ms) progress {}%",
            ctx.time.frame_index,
            ctx.time.dt * 1000.0,
            self.face.progress()
        );

        let dl = &mut self.draw_list;
        let rects = &mut self.rect_renderer;
        let lines = &mut self.line_renderer;

        let status = ctx.render(self.face.config().background, |rctx, target| {
            rects.render(rctx, target, dl);
            lines.render(rctx, target, dl);
        });
        self.finish_frame(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::time::Duration;
    use tickface_engine::input::{InputEvent, InputState, Key, KeyState};

    struct Fixed(NaiveTime);

    impl TimeSource for Fixed {
        fn local_time(&self) -> NaiveTime {
            self.0
        }
    }

    fn app_at(h: u32, m: u32, s: u32) -> ClockApp<Fixed> {
        let t = NaiveTime::from_hms_opt(h, m, s).unwrap();
        ClockApp::with_time_source(FaceConfig::default(), Fixed(t))
    }

    #[test]
    fn first_schedule_loads_the_face() {
        let mut app = app_at(4, 20, 0);
        assert_eq!(app.redraw_schedule(Instant::now()), RedrawSchedule::Now);
        assert_eq!(app.face().angles().minute, crate::TRIG_MAX_ANGLE / 3);
    }

    #[test]
    fn settles_to_timed_wake_after_sweep() {
        let mut app = app_at(4, 20, 0);
        let t0 = Instant::now();
        app.redraw_schedule(t0);
        app.face.take_dirty();

        let after = t0 + Duration::from_secs(1);
        assert_eq!(app.redraw_schedule(after), RedrawSchedule::Now);
        app.face.take_dirty();

        assert!(matches!(app.redraw_schedule(after), RedrawSchedule::At(t) if t > after));
    }

    fn press(keys: &[Key]) -> InputFrame {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for &key in keys {
            state.apply_event(&mut frame, InputEvent::Key { key, state: KeyState::Pressed, repeat: false });
        }
        frame
    }

    #[test]
    fn back_buttons_close_the_face() {
        let mut app = app_at(0, 0, 0);
        assert_eq!(app.handle_buttons(&press(&[Key::Escape])), AppControl::Exit);
        assert_eq!(app.handle_buttons(&press(&[Key::Q])), AppControl::Exit);
        assert_eq!(app.handle_buttons(&press(&[Key::ArrowUp])), AppControl::Continue);
    }

    #[test]
    fn select_toggles_quick_view_and_redraws() {
        let mut app = app_at(0, 0, 0);
        app.face.take_dirty();

        assert_eq!(app.handle_buttons(&press(&[Key::Enter])), AppControl::Continue);
        assert!(app.peek);
        assert!(app.face().is_dirty());

        app.handle_buttons(&press(&[Key::Space]));
        assert!(!app.peek);
    }

    #[test]
    fn both_select_keys_in_one_frame_toggle_once() {
        let mut app = app_at(0, 0, 0);
        app.handle_buttons(&press(&[Key::Enter, Key::Space]));
        assert!(app.peek);
    }

    #[test]
    fn skipped_frame_keeps_face_dirty() {
        let mut app = app_at(0, 0, 0);
        let t0 = Instant::now();
        app.redraw_schedule(t0);

        assert_eq!(app.finish_frame(FrameStatus::Skipped), AppControl::Continue);
        assert!(app.face().is_dirty());
        assert_eq!(app.redraw_schedule(t0), RedrawSchedule::Now);

        assert_eq!(app.finish_frame(FrameStatus::Presented), AppControl::Continue);
        assert!(!app.face().is_dirty());
    }

    #[test]
    fn lost_surface_exits() {
        let mut app = app_at(0, 0, 0);
        assert_eq!(app.finish_frame(FrameStatus::Lost), AppControl::Exit);
    }

    #[test]
    fn peek_shrinks_visible_area() {
        let mut app = app_at(0, 0, 0);
        let bounds = Rect::new(0.0, 0.0, 180.0, 180.0);
        assert_eq!(app.unobstructed(bounds), None);

        app.peek = true;
        assert_eq!(app.unobstructed(bounds), Some(Rect::new(0.0, 0.0, 180.0, 129.0)));
    }
}
