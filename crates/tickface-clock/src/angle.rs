//! Fixed-point hand angles.
//!
//! A full turn is [`TRIG_MAX_ANGLE`]; 0 points at 12 o'clock and angles grow
//! clockwise.

use std::f32::consts::TAU;

use tickface_engine::coords::{Rect, Vec2};

use crate::scheduler::WallTime;

/// One full turn in angle units.
pub const TRIG_MAX_ANGLE: i32 = 0x10000;

/// Hand angles for one displayed second.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ClockAngles {
    pub second: i32,
    pub minute: i32,
    pub hour: i32,
}

impl ClockAngles {
    /// Maps a time of day onto the dial.
    ///
    /// The hour hand advances in ten-minute steps between hour marks.
    pub fn from_time(time: WallTime) -> Self {
        let (h, m, s) = (time.hour as i32, time.minute as i32, time.second as i32);
        Self {
            second: TRIG_MAX_ANGLE * s / 60,
            minute: TRIG_MAX_ANGLE * m / 60,
            hour: TRIG_MAX_ANGLE * ((h % 12) * 6 + m / 10) / (12 * 6),
        }
    }
}

/// The part of a turn covered by `percent` (0..=100).
#[inline]
pub fn turn_fraction(percent: u32) -> i32 {
    TRIG_MAX_ANGLE * percent.min(100) as i32 / 100
}

/// Projects `angle` onto the largest circle centered in `rect`.
pub fn polar(rect: Rect, angle: i32) -> Vec2 {
    let r = rect.normalized();
    let radius = r.size.x.min(r.size.y) * 0.5;
    let a = angle as f32 * TAU / TRIG_MAX_ANGLE as f32;
    let c = r.center();
    Vec2::new(c.x + a.sin() * radius, c.y - a.cos() * radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(hour: u32, minute: u32, second: u32) -> ClockAngles {
        ClockAngles::from_time(WallTime { hour, minute, second })
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn midnight_points_up() {
        assert_eq!(at(0, 0, 0), ClockAngles::default());
    }

    #[test]
    fn quarter_marks() {
        let a = at(15, 15, 15);
        assert_eq!(a.second, TRIG_MAX_ANGLE / 4);
        assert_eq!(a.minute, TRIG_MAX_ANGLE / 4);
        // 3:15 is one ten-minute step past the 3.
        assert_eq!(a.hour, TRIG_MAX_ANGLE * 19 / 72);
    }

    #[test]
    fn hour_hand_steps_every_ten_minutes() {
        assert_eq!(at(6, 0, 0).hour, at(6, 9, 59).hour);
        assert!(at(6, 10, 0).hour > at(6, 9, 59).hour);
        assert_eq!(at(6, 30, 0).hour, TRIG_MAX_ANGLE * 39 / 72);
    }

    #[test]
    fn afternoon_matches_morning() {
        assert_eq!(at(13, 20, 5), at(1, 20, 5));
    }

    #[test]
    fn every_time_of_day_stays_on_the_dial() {
        for h in 0..24 {
            for m in 0..60 {
                for s in 0..60 {
                    let a = at(h, m, s);
                    for v in [a.second, a.minute, a.hour] {
                        assert!((0..TRIG_MAX_ANGLE).contains(&v), "{h}:{m}:{s} -> {a:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn turn_fraction_saturates() {
        assert_eq!(turn_fraction(0), 0);
        assert_eq!(turn_fraction(50), TRIG_MAX_ANGLE / 2);
        assert_eq!(turn_fraction(100), TRIG_MAX_ANGLE);
        assert_eq!(turn_fraction(250), TRIG_MAX_ANGLE);
    }

    #[test]
    fn polar_uses_inscribed_circle() {
        let r = Rect::new(0.0, 0.0, 100.0, 60.0);
        assert!(close(polar(r, 0), Vec2::new(50.0, 0.0)));
        assert!(close(polar(r, TRIG_MAX_ANGLE / 4), Vec2::new(80.0, 30.0)));
        assert!(close(polar(r, TRIG_MAX_ANGLE / 2), Vec2::new(50.0, 60.0)));
        assert!(close(polar(r, TRIG_MAX_ANGLE), polar(r, 0)));
    }

    #[test]
    fn polar_of_empty_rect_is_its_center() {
        let r = Rect::new(10.0, 20.0, 0.0, 0.0);
        assert!(close(polar(r, 12345), Vec2::new(10.0, 20.0)));
    }

    proptest! {
        #[test]
        fn angles_within_full_turn(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            let a = at(h, m, s);
            prop_assert!((0..TRIG_MAX_ANGLE).contains(&a.second));
            prop_assert!((0..TRIG_MAX_ANGLE).contains(&a.minute));
            prop_assert!((0..TRIG_MAX_ANGLE).contains(&a.hour));
        }

        #[test]
        fn polar_lands_on_circle(angle in any::<i32>(), w in 1.0f32..500.0, h in 1.0f32..500.0) {
            let r = Rect::new(0.0, 0.0, w, h);
            let d = (polar(r, angle) - r.center()).length();
            prop_assert!((d - w.min(h) * 0.5).abs() < 1e-2);
        }
    }
}
