use tickface_engine::coords::{Rect, Vec2};
use tickface_engine::scene::shapes::LineCap;
use tickface_engine::scene::{DrawList, ZIndex};

use crate::angle::{polar, turn_fraction, ClockAngles};
use crate::animation::{Animation, AnimationProgress};
use crate::config::FaceConfig;
use crate::scheduler::{FaceHandlers, WallTime};

/// One hand, from its inner anchor to its outer anchor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandSegment {
    pub from: Vec2,
    pub to: Vec2,
}

/// Resolved geometry of one painted frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaceLayout {
    /// Display bounds after shifting for any obstruction.
    pub bounds: Rect,
    pub second_inset: Rect,
    pub minute_inset: Rect,
    pub hour_inset: Rect,
    pub second: HandSegment,
    pub minute: HandSegment,
    pub hour: HandSegment,
}

/// State of the analog face between ticks.
#[derive(Debug)]
pub struct ClockFace {
    config: FaceConfig,
    angles: ClockAngles,
    /// Sweep progress, 0..=100.
    progress: u32,
    dirty: bool,
}

impl ClockFace {
    pub fn new(config: FaceConfig) -> Self {
        Self {
            config,
            angles: ClockAngles::default(),
            progress: 0,
            dirty: true,
        }
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn angles(&self) -> ClockAngles {
        self.angles
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears and returns the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Recomputes all hand angles and returns the sweep to schedule.
    pub fn on_tick(&mut self, time: WallTime) -> Animation {
        self.angles = ClockAngles::from_time(time);
        self.progress = 0;
        self.dirty = true;
        log::trace!("angles {:?}", self.angles);

        Animation::new(self.config.sweep_duration).with_curve(self.config.sweep_curve)
    }

    pub fn on_animation_update(&mut self, progress: AnimationProgress) {
        self.progress = progress.percent();
        self.dirty = true;
    }

    /// Hand geometry for `bounds`.
    ///
    /// When part of the display is obstructed the face moves up by half the
    /// covered height, keeping it centered in what remains visible.
    pub fn layout(&self, bounds: Rect, unobstructed: Option<Rect>) -> FaceLayout {
        let mut bounds = bounds.normalized();
        if let Some(visible) = unobstructed {
            let covered = (bounds.size.y - visible.normalized().size.y).max(0.0);
            bounds = bounds.translated(Vec2::new(0.0, -covered * 0.5));
        }

        let second_inset = bounds.inset(self.config.second_inset);
        let minute_inset = second_inset.inset(self.config.minute_inset);
        let hour_inset = minute_inset.inset(self.config.hour_inset);

        let boost = turn_fraction(self.progress);
        let second_angle = self.angles.second + boost;
        // The minute hand only sweeps along when the second hand rolls over.
        let minute_angle = if self.angles.second == 0 {
            self.angles.minute + boost
        } else {
            self.angles.minute
        };
        let hour_angle = self.angles.hour;

        let hand = |inner: Rect, outer: Rect, angle: i32| HandSegment {
            from: polar(inner, angle),
            to: polar(outer, angle),
        };

        FaceLayout {
            bounds,
            second_inset,
            minute_inset,
            hour_inset,
            second: hand(second_inset, bounds, second_angle),
            minute: hand(minute_inset, second_inset, minute_angle),
            hour: hand(hour_inset, minute_inset, hour_angle),
        }
    }

    /// Paints the background and the three hands into `draw_list`.
    pub fn draw(&self, bounds: Rect, unobstructed: Option<Rect>, draw_list: &mut DrawList) {
        let layout = self.layout(bounds, unobstructed);
        let cfg = &self.config;

        draw_list.push_solid_rect(ZIndex::BACKGROUND, layout.bounds, cfg.background);

        for hand in [layout.second, layout.minute, layout.hour] {
            draw_list.push_line(
                ZIndex::FOREGROUND,
                hand.from,
                hand.to,
                cfg.stroke_width,
                cfg.hand_color,
                LineCap::Round,
            );
        }
    }
}

impl FaceHandlers for ClockFace {
    fn on_tick(&mut self, time: WallTime) -> Option<Animation> {
        Some(ClockFace::on_tick(self, time))
    }

    fn on_animation_update(&mut self, progress: AnimationProgress) {
        ClockFace::on_animation_update(self, progress);
    }
}
