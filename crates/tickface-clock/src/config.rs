use std::time::Duration;

use tickface_engine::paint::Color;

use crate::animation::AnimationCurve;

/// Geometry, colors and timing of the clock face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceConfig {
    /// Inset from the display edge to the inner end of the second hand.
    pub second_inset: f32,
    /// Further inset to the inner end of the minute hand.
    pub minute_inset: f32,
    /// Further inset to the inner end of the hour hand.
    pub hour_inset: f32,

    pub stroke_width: f32,
    pub hand_color: Color,
    pub background: Color,

    /// Length of the second-hand sweep started on every tick.
    pub sweep_duration: Duration,
    pub sweep_curve: AnimationCurve,
    /// Minimum spacing between animation updates.
    pub frame_interval: Duration,

    /// Height of the simulated quick-view overlay toggled with Select.
    pub peek_height: f32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            second_inset: 10.0,
            minute_inset: 20.0,
            hour_inset: 30.0,
            stroke_width: 4.0,
            hand_color: Color::picton_blue(),
            background: Color::black(),
            sweep_duration: Duration::from_millis(500),
            sweep_curve: AnimationCurve::EaseInOut,
            frame_interval: Duration::from_millis(16),
            peek_height: 51.0,
        }
    }
}
