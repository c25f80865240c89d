use std::time::{Duration, Instant};

/// Progress value of a finished animation.
pub const ANIMATION_NORMALIZED_MAX: u32 = 65535;

/// Timing curve applied to linear elapsed time.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AnimationCurve {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl AnimationCurve {
    /// Maps `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            AnimationCurve::Linear => t,
            AnimationCurve::EaseIn => t * t,
            AnimationCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            AnimationCurve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u * 0.5
                }
            }
        }
    }
}

/// Normalized animation progress in `0..=ANIMATION_NORMALIZED_MAX`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct AnimationProgress(u32);

impl AnimationProgress {
    pub const ZERO: AnimationProgress = AnimationProgress(0);
    pub const FULL: AnimationProgress = AnimationProgress(ANIMATION_NORMALIZED_MAX);

    /// Clamps `value` into the normalized range.
    #[inline]
    pub fn new(value: u32) -> Self {
        Self(value.min(ANIMATION_NORMALIZED_MAX))
    }

    /// Integer percentage, truncated.
    #[inline]
    pub fn percent(self) -> u32 {
        self.0 * 100 / ANIMATION_NORMALIZED_MAX
    }

    #[inline]
    pub fn is_complete(self) -> bool {
        self.0 == ANIMATION_NORMALIZED_MAX
    }
}

/// A single timed animation.
///
/// The clock starts on the first [`start`](Self::start) call; until then the
/// animation reports zero progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    duration: Duration,
    curve: AnimationCurve,
    started_at: Option<Instant>,
}

impl Animation {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            curve: AnimationCurve::default(),
            started_at: None,
        }
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn curve(&self) -> AnimationCurve {
        self.curve
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Starts the animation at `now`. Restarting an animation is a no-op.
    pub fn start(&mut self, now: Instant) {
        self.started_at.get_or_insert(now);
    }

    /// Eased progress at `now`. Monotone non-decreasing in `now`.
    pub fn progress(&self, now: Instant) -> AnimationProgress {
        let Some(start) = self.started_at else {
            return AnimationProgress::ZERO;
        };
        if self.duration.is_zero() {
            return AnimationProgress::FULL;
        }

        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.duration {
            return AnimationProgress::FULL;
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.curve.apply(t);
        AnimationProgress::new((eased * ANIMATION_NORMALIZED_MAX as f32).round() as u32)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now).is_complete()
    }

    /// The instant the animation reaches full progress, once started.
    pub fn ends_at(&self) -> Option<Instant> {
        self.started_at.map(|s| s + self.duration)
    }
}
