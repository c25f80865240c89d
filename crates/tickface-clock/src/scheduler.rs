//! Tick and animation-frame dispatch.
//!
//! The host loop polls a [`FaceScheduler`]; it turns wall-clock second changes
//! into `on_tick` calls and drives the single active [`Animation`] through
//! `on_animation_update`.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveTime, Timelike};

use crate::animation::{Animation, AnimationProgress};

/// Time of day at second resolution.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct WallTime {
    /// 0..24
    pub hour: u32,
    /// 0..60
    pub minute: u32,
    /// 0..60
    pub second: u32,
}

impl WallTime {
    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            // Leap seconds are reported as second 59 with extra nanoseconds.
            second: t.second().min(59),
        }
    }
}

/// Source of local time of day.
pub trait TimeSource {
    fn local_time(&self) -> NaiveTime;
}

/// Host local time via `chrono::Local`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn local_time(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Receivers of scheduler events.
pub trait FaceHandlers {
    /// Called once per changed second. A returned animation replaces any
    /// running one.
    fn on_tick(&mut self, time: WallTime) -> Option<Animation>;

    fn on_animation_update(&mut self, progress: AnimationProgress);
}

/// Detects second changes of a [`TimeSource`].
#[derive(Debug, Default)]
pub struct TickService {
    last: Option<WallTime>,
}

impl TickService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current time when its second differs from the last delivered one.
    pub fn poll<T: TimeSource>(&mut self, source: &T) -> Option<WallTime> {
        let now = WallTime::from_timelike(&source.local_time());
        if self.last == Some(now) {
            return None;
        }
        self.last = Some(now);
        Some(now)
    }

    /// Last delivered time, if any.
    pub fn last(&self) -> Option<WallTime> {
        self.last
    }

    /// Time left until the next second boundary of `source`.
    pub fn until_next_tick<T: TimeSource>(&self, source: &T) -> Duration {
        let nanos = source.local_time().nanosecond() % 1_000_000_000;
        Duration::from_nanos(u64::from(1_000_000_000 - nanos))
    }
}

/// Dispatches ticks and animation frames to a [`FaceHandlers`].
#[derive(Debug)]
pub struct FaceScheduler<T: TimeSource = LocalClock> {
    source: T,
    ticks: TickService,
    active: Option<Animation>,
    frame_interval: Duration,
    next_frame: Option<Instant>,
}

impl<T: TimeSource> FaceScheduler<T> {
    pub fn new(source: T, frame_interval: Duration) -> Self {
        Self {
            source,
            ticks: TickService::new(),
            active: None,
            frame_interval,
            next_frame: None,
        }
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Delivers the first tick right away so the face shows the time at load.
    pub fn start<H: FaceHandlers>(&mut self, handlers: &mut H, now: Instant) {
        self.poll(handlers, now);
        log::debug!("face loaded at {:?}", self.ticks.last());
    }

    /// Dispatches pending work. Returns `true` if any handler ran.
    pub fn poll<H: FaceHandlers>(&mut self, handlers: &mut H, now: Instant) -> bool {
        let mut ran = false;

        if let Some(time) = self.ticks.poll(&self.source) {
            log::trace!("tick {:02}:{:02}:{:02}", time.hour, time.minute, time.second);
            self.active = handlers.on_tick(time).map(|mut anim| {
                anim.start(now);
                anim
            });
            self.next_frame = None;
            ran = true;
        }

        let Some(anim) = &self.active else {
            return ran;
        };

        let finished = anim.is_finished(now);
        let frame_due = self.next_frame.is_none_or(|due| now >= due);
        if !finished && !frame_due {
            return ran;
        }

        handlers.on_animation_update(anim.progress(now));
        if finished {
            self.active = None;
            self.next_frame = None;
        } else {
            self.next_frame = Some(now + self.frame_interval);
        }
        true
    }

    /// When the scheduler next has work.
    pub fn next_wake(&self, now: Instant) -> Instant {
        match &self.active {
            Some(anim) => {
                let frame = self.next_frame.unwrap_or(now);
                match anim.ends_at() {
                    Some(end) => frame.min(end),
                    None => frame,
                }
            }
            None => now + self.ticks.until_next_tick(&self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Manually advanced time source.
    #[derive(Debug)]
    struct MockClock {
        now: Cell<NaiveTime>,
    }

    impl MockClock {
        fn at(h: u32, m: u32, s: u32) -> Self {
            Self { now: Cell::new(hms(h, m, s, 0)) }
        }

        fn set(&self, t: NaiveTime) {
            self.now.set(t);
        }
    }

    impl TimeSource for MockClock {
        fn local_time(&self) -> NaiveTime {
            self.now.get()
        }
    }

    fn hms(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        ticks: Vec<WallTime>,
        updates: Vec<AnimationProgress>,
        sweep: Option<Duration>,
    }

    impl FaceHandlers for Recorder {
        fn on_tick(&mut self, time: WallTime) -> Option<Animation> {
            self.ticks.push(time);
            self.sweep.map(Animation::new)
        }

        fn on_animation_update(&mut self, progress: AnimationProgress) {
            self.updates.push(progress);
        }
    }

    fn recorder(sweep_ms: u64) -> Recorder {
        Recorder { sweep: Some(Duration::from_millis(sweep_ms)), ..Recorder::default() }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn start_delivers_first_tick() {
        let mut sched = FaceScheduler::new(MockClock::at(10, 8, 30), ms(16));
        let mut rec = Recorder::default();

        sched.start(&mut rec, Instant::now());

        assert_eq!(rec.ticks, vec![WallTime { hour: 10, minute: 8, second: 30 }]);
        assert!(!sched.is_animating());
    }

    #[test]
    fn same_second_is_not_redelivered() {
        let mut sched = FaceScheduler::new(MockClock::at(1, 2, 3), ms(16));
        let mut rec = Recorder::default();
        let t0 = Instant::now();

        sched.start(&mut rec, t0);
        sched.source().set(hms(1, 2, 3, 900));
        assert!(!sched.poll(&mut rec, t0 + ms(900)));
        assert_eq!(rec.ticks.len(), 1);

        sched.source().set(hms(1, 2, 4, 0));
        assert!(sched.poll(&mut rec, t0 + ms(1000)));
        assert_eq!(rec.ticks.len(), 2);
    }

    #[test]
    fn animation_runs_to_completion_then_stops() {
        let mut sched = FaceScheduler::new(MockClock::at(0, 0, 0), ms(16));
        let mut rec = recorder(500);
        let t0 = Instant::now();

        sched.start(&mut rec, t0);
        assert!(sched.is_animating());
        assert_eq!(rec.updates, vec![AnimationProgress::ZERO]);

        let mut t = t0;
        while sched.is_animating() {
            t += ms(16);
            sched.poll(&mut rec, t);
        }

        assert_eq!(rec.updates.last(), Some(&AnimationProgress::FULL));
        assert!(rec.updates.windows(2).all(|w| w[0] <= w[1]));
        assert!(!sched.poll(&mut rec, t + ms(16)));
    }

    #[test]
    fn frames_are_throttled_to_interval() {
        let mut sched = FaceScheduler::new(MockClock::at(0, 0, 0), ms(16));
        let mut rec = recorder(500);
        let t0 = Instant::now();

        sched.start(&mut rec, t0);
        assert!(!sched.poll(&mut rec, t0 + ms(5)));
        assert!(sched.poll(&mut rec, t0 + ms(16)));
        assert_eq!(rec.updates.len(), 2);
    }

    #[test]
    fn final_update_is_not_throttled() {
        let mut sched = FaceScheduler::new(MockClock::at(0, 0, 0), ms(400));
        let mut rec = recorder(500);
        let t0 = Instant::now();

        sched.start(&mut rec, t0);
        sched.poll(&mut rec, t0 + ms(400));
        assert!(sched.poll(&mut rec, t0 + ms(500)));
        assert_eq!(rec.updates.last(), Some(&AnimationProgress::FULL));
        assert!(!sched.is_animating());
    }

    #[test]
    fn new_tick_restarts_animation() {
        let mut sched = FaceScheduler::new(MockClock::at(0, 0, 0), ms(16));
        let mut rec = recorder(2000);
        let t0 = Instant::now();

        sched.start(&mut rec, t0);
        sched.poll(&mut rec, t0 + ms(800));
        let mid = *rec.updates.last().unwrap();
        assert!(mid > AnimationProgress::ZERO);

        sched.source().set(hms(0, 0, 1, 0));
        sched.poll(&mut rec, t0 + ms(1000));

        assert_eq!(rec.ticks.len(), 2);
        assert_eq!(rec.updates.last(), Some(&AnimationProgress::ZERO));
    }

    #[test]
    fn zero_length_sweep_finishes_on_first_update() {
        let mut sched = FaceScheduler::new(MockClock::at(0, 0, 0), ms(16));
        let mut rec = recorder(0);

        sched.start(&mut rec, Instant::now());

        assert_eq!(rec.updates, vec![AnimationProgress::FULL]);
        assert!(!sched.is_animating());
    }

    #[test]
    fn idle_wake_is_next_second_boundary() {
        let clock = MockClock::at(9, 0, 0);
        clock.set(hms(9, 0, 0, 250));
        let sched = FaceScheduler::new(clock, ms(16));
        let now = Instant::now();

        assert_eq!(sched.next_wake(now), now + ms(750));
    }

    #[test]
    fn animating_wake_is_next_frame() {
        let mut sched = FaceScheduler::new(MockClock::at(0, 0, 0), ms(16));
        let mut rec = recorder(500);
        let t0 = Instant::now();

        sched.start(&mut rec, t0);
        assert_eq!(sched.next_wake(t0), t0 + ms(16));
    }

    #[test]
    fn wall_time_clamps_leap_second() {
        let leap = NaiveTime::from_hms_milli_opt(23, 59, 59, 1500).unwrap();
        assert_eq!(WallTime::from_timelike(&leap).second, 59);
        let svc = TickService::new();
        let clock = MockClock::at(0, 0, 0);
        clock.set(leap);
        assert_eq!(svc.until_next_tick(&clock), ms(500));
    }
}
