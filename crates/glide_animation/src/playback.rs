//! Playback timing shared by every leaf animation
//!
//! `Playback` owns the clock of a tween: duration, elapsed time, delay,
//! looping and direction. It turns a frame delta into the effective time to
//! sample, leaving value computation to the owner.
//!
//! A start delay is stored as negative elapsed time, so a delayed tween
//! simply counts up through zero before anything is pushed.

use crate::easing::{normalized_time, EaseCurve, Easing};
use crate::tweenable::Frame;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{trace, warn};

/// Shortest duration a tween may have, in seconds
pub const DEFAULT_MIN_DURATION: f32 = 1e-4;

/// Most loop-completion handler calls a single frame can trigger
pub const MAX_LOOP_EVENTS_PER_FRAME: u32 = 64;

/// Lifecycle state of a tween
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TweenState {
    /// Not started yet
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// How a tween continues once it reaches its end
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopType {
    /// Play once
    #[default]
    None,
    /// Jump back to the start and play again
    Restart,
    /// Play back and forth, each leg counting as half a loop
    PingPong,
}

/// Outcome of advancing the clock by one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// Nothing to push: not running, or still inside a delay
    Idle,
    /// Push the value at `time`
    Update { time: f32, loops_completed: u32 },
    /// Push the value at `time`, then complete
    Finished { time: f32, loops_completed: u32 },
}

/// Timing state machine of a single tween
#[derive(Clone, Debug)]
pub struct Playback {
    duration: f32,
    elapsed: f32,
    delay: f32,
    easing: Easing,
    curve: Option<Rc<EaseCurve>>,
    loop_type: LoopType,
    /// Remaining legs to play after the current one, -1 for infinite
    loops: i32,
    /// Legs configured by `set_loops`, restored on restart
    loop_legs: i32,
    loop_delay: f32,
    reversed: bool,
    unscaled: bool,
    state: TweenState,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            duration: DEFAULT_MIN_DURATION,
            elapsed: 0.0,
            delay: 0.0,
            easing: Easing::default(),
            curve: None,
            loop_type: LoopType::None,
            loops: 0,
            loop_legs: 0,
            loop_delay: 0.0,
            reversed: false,
            unscaled: false,
            state: TweenState::Idle,
        }
    }
}

impl Playback {
    pub fn new(duration: f32) -> Self {
        let mut playback = Self::default();
        playback.set_duration(duration, DEFAULT_MIN_DURATION);
        playback
    }

    /// Reset every field and start running
    pub fn reset(&mut self, duration: f32, min_duration: f32) {
        *self = Self::default();
        self.set_duration(duration, min_duration);
        self.state = TweenState::Running;
    }

    /// Set the duration, clamping invalid values to `min_duration`
    pub fn set_duration(&mut self, duration: f32, min_duration: f32) {
        let min_duration = min_duration.max(f32::EPSILON);
        self.duration = if !duration.is_finite() || duration < min_duration {
            warn!(duration, min_duration, "tween duration clamped");
            min_duration
        } else {
            duration
        };
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Elapsed time of the current leg; negative while delayed
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TweenState::Running | TweenState::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.state == TweenState::Paused
    }

    pub fn is_completed(&self) -> bool {
        self.state == TweenState::Completed
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Custom curve; overrides the easing while set
    pub fn set_curve(&mut self, curve: Option<Rc<EaseCurve>>) {
        self.curve = curve;
    }

    pub fn has_curve(&self) -> bool {
        self.curve.is_some()
    }

    /// Delay before the first leg starts
    pub fn set_delay(&mut self, delay: f32) {
        self.delay = delay.max(0.0);
        self.elapsed = -self.delay;
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Configure looping. `loops` counts full cycles, -1 for infinite; a
    /// ping-pong cycle is there and back.
    pub fn set_loops(&mut self, loop_type: LoopType, loops: i32, loop_delay: f32) {
        self.loop_type = loop_type;
        self.loop_delay = loop_delay.max(0.0);
        self.loops = match (loop_type, loops) {
            (LoopType::None, _) => 0,
            (_, l) if l < 0 => -1,
            (LoopType::PingPong, l) => l.saturating_mul(2),
            (LoopType::Restart, l) => l,
        };
        self.loop_legs = self.loops;
    }

    pub fn loop_type(&self) -> LoopType {
        self.loop_type
    }

    /// Remaining legs, -1 for infinite
    pub fn loops_remaining(&self) -> i32 {
        self.loops
    }

    pub fn set_unscaled(&mut self, unscaled: bool) {
        self.unscaled = unscaled;
    }

    pub fn is_unscaled(&self) -> bool {
        self.unscaled
    }

    pub fn pause(&mut self) {
        if self.state == TweenState::Running {
            self.state = TweenState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TweenState::Paused {
            self.state = TweenState::Running;
        }
    }

    /// Rewind to the start of the first leg, keeping the configuration
    pub fn restart(&mut self) {
        self.elapsed = -self.delay;
        self.loops = self.loop_legs;
        self.reversed = false;
        self.state = TweenState::Running;
    }

    /// Play the remainder of the current leg in the opposite direction
    pub fn reverse(&mut self) {
        self.elapsed = self.duration - self.elapsed.clamp(0.0, self.duration);
        self.reversed = !self.reversed;
    }

    /// Move the clock of the current leg, clamped to `[0, duration]`
    pub fn jump_to(&mut self, elapsed: f32) {
        self.elapsed = elapsed.clamp(0.0, self.duration);
    }

    /// Jump to the end of the current leg and complete. Returns the
    /// effective time of the final value.
    pub fn finish(&mut self) -> f32 {
        self.elapsed = self.duration;
        self.state = TweenState::Completed;
        self.time()
    }

    /// Complete in place, leaving the clock where it is
    pub fn terminate(&mut self) {
        self.state = TweenState::Completed;
    }

    /// Effective time of the current position, mirrored when reversed
    pub fn time(&self) -> f32 {
        self.time_at(self.elapsed)
    }

    fn time_at(&self, elapsed: f32) -> f32 {
        let e = elapsed.clamp(0.0, self.duration);
        if self.reversed {
            self.duration - e
        } else {
            e
        }
    }

    /// Eased progress at an effective time
    pub fn progress(&self, time: f32) -> f32 {
        match &self.curve {
            Some(curve) => curve.progress(time, self.duration),
            None => self.easing.apply(normalized_time(time, self.duration)),
        }
    }

    /// Advance the clock by one frame
    ///
    /// Any number of legs can wrap in one call; the cost does not depend
    /// on the delta.
    pub fn advance(&mut self, frame: &Frame) -> Advance {
        if self.state != TweenState::Running {
            return Advance::Idle;
        }

        let delta = frame.delta_for(self.unscaled);
        let delta = if delta.is_nan() || delta < 0.0 {
            trace!(delta, "ignored invalid frame delta");
            0.0
        } else {
            delta.min(f32::MAX)
        };
        self.elapsed = (self.elapsed + delta).min(f32::MAX);

        if self.elapsed < self.duration {
            if self.elapsed < 0.0 {
                return Advance::Idle;
            }
            return Advance::Update {
                time: self.time(),
                loops_completed: 0,
            };
        }

        if self.loop_type == LoopType::None || self.loops == 0 {
            return self.complete(0);
        }

        // One wrap per whole cycle that fits in the overshoot
        let excess = self.elapsed - self.duration;
        let cycle = self.duration + self.loop_delay;
        let wraps = ((excess as f64 / cycle as f64).floor() + 1.0).min(u32::MAX as f64) as u32;

        if self.loops > 0 && wraps > self.loops as u32 {
            let legs = self.loops as u32;
            self.loops = 0;
            self.flip_legs(legs);
            return self.complete(legs);
        }

        if self.loops > 0 {
            self.loops -= wraps as i32;
        }
        self.flip_legs(wraps);
        // Boundary of the last leg that wrapped
        let leg_end = match (self.loop_type, self.reversed) {
            (LoopType::PingPong, true) => self.duration,
            (LoopType::PingPong, false) => 0.0,
            _ => self.time_at(self.duration),
        };
        self.elapsed = excess.rem_euclid(cycle) - self.loop_delay;

        // Waiting out the loop delay: hold the boundary value
        if self.elapsed < 0.0 {
            return Advance::Update {
                time: leg_end,
                loops_completed: wraps,
            };
        }

        Advance::Update {
            time: self.time(),
            loops_completed: wraps,
        }
    }

    fn flip_legs(&mut self, legs: u32) {
        if self.loop_type == LoopType::PingPong && legs % 2 == 1 {
            self.reversed = !self.reversed;
        }
    }

    fn complete(&mut self, loops_completed: u32) -> Advance {
        self.elapsed = self.duration;
        self.state = TweenState::Completed;
        Advance::Finished {
            time: self.time(),
            loops_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(duration: f32) -> Playback {
        let mut p = Playback::default();
        p.reset(duration, DEFAULT_MIN_DURATION);
        p
    }

    #[test]
    fn test_advance_and_finish() {
        let mut p = running(1.0);
        assert_eq!(
            p.advance(&Frame::new(0.25)),
            Advance::Update {
                time: 0.25,
                loops_completed: 0
            }
        );
        match p.advance(&Frame::new(1.0)) {
            Advance::Finished { time, .. } => assert_eq!(time, 1.0),
            other => panic!("expected finish, got {:?}", other),
        }
        assert!(p.is_completed());
        assert_eq!(p.advance(&Frame::new(1.0)), Advance::Idle);
    }

    #[test]
    fn test_delay_is_negative_elapsed() {
        let mut p = running(1.0);
        p.set_delay(0.5);
        assert_eq!(p.elapsed(), -0.5);
        assert_eq!(p.advance(&Frame::new(0.25)), Advance::Idle);
        match p.advance(&Frame::new(0.5)) {
            Advance::Update { time, .. } => assert!((time - 0.25).abs() < 1e-6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_duration_clamped() {
        assert_eq!(Playback::new(0.0).duration(), DEFAULT_MIN_DURATION);
        assert_eq!(Playback::new(-3.0).duration(), DEFAULT_MIN_DURATION);
        assert_eq!(Playback::new(f32::NAN).duration(), DEFAULT_MIN_DURATION);
        assert_eq!(Playback::new(2.0).duration(), 2.0);
    }

    #[test]
    fn test_restart_loop_carries_excess() {
        let mut p = running(1.0);
        p.set_loops(LoopType::Restart, 1, 0.0);
        match p.advance(&Frame::new(1.25)) {
            Advance::Update {
                time,
                loops_completed,
            } => {
                assert!((time - 0.25).abs() < 1e-6);
                assert_eq!(loops_completed, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            p.advance(&Frame::new(1.0)),
            Advance::Finished { .. }
        ));
    }

    #[test]
    fn test_ping_pong_mirrors() {
        let mut p = running(1.0);
        p.set_loops(LoopType::PingPong, -1, 0.0);
        p.advance(&Frame::new(1.3));
        assert!(p.is_reversed());
        assert!((p.time() - 0.7).abs() < 1e-5);
        // A ping-pong cycle is two legs, so infinite keeps going
        p.advance(&Frame::new(1.0));
        assert!(!p.is_reversed());
        assert!(p.is_running());
    }

    #[test]
    fn test_ping_pong_counts_both_legs() {
        let mut p = running(1.0);
        p.set_loops(LoopType::PingPong, 1, 0.0);
        assert_eq!(p.loops_remaining(), 2);
        p.advance(&Frame::new(1.0));
        p.advance(&Frame::new(1.0));
        assert!(p.is_running());
        match p.advance(&Frame::new(1.0)) {
            Advance::Finished { time, .. } => assert_eq!(time, 1.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_loop_delay_holds_boundary() {
        let mut p = running(1.0);
        p.set_loops(LoopType::Restart, 1, 0.5);
        match p.advance(&Frame::new(1.1)) {
            Advance::Update { time, .. } => assert_eq!(time, 1.0),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(p.advance(&Frame::new(0.1)), Advance::Idle);
    }

    #[test]
    fn test_pause_resume() {
        let mut p = running(1.0);
        p.pause();
        assert!(p.is_paused());
        assert_eq!(p.advance(&Frame::new(0.5)), Advance::Idle);
        p.resume();
        assert!(!p.is_paused());
        assert!(matches!(p.advance(&Frame::new(0.5)), Advance::Update { .. }));
    }

    #[test]
    fn test_reverse_and_jump() {
        let mut p = running(2.0);
        p.advance(&Frame::new(0.5));
        p.reverse();
        assert!(p.is_reversed());
        assert!((p.time() - 0.5).abs() < 1e-6);
        p.jump_to(5.0);
        assert_eq!(p.elapsed(), 2.0);
    }

    #[test]
    fn test_huge_delta_wraps_in_one_step() {
        let mut p = running(0.0);
        p.set_loops(LoopType::Restart, -1, 0.0);
        match p.advance(&Frame::new(4096.0)) {
            Advance::Update { loops_completed, .. } => assert!(loops_completed > 1_000_000),
            other => panic!("unexpected {:?}", other),
        }
        assert!(p.is_running());
        assert!(p.elapsed() >= 0.0 && p.elapsed() < p.duration());
    }

    #[test]
    fn test_huge_delta_caps_at_remaining_loops() {
        let mut p = running(1.0);
        p.set_loops(LoopType::PingPong, 2, 0.25);
        match p.advance(&Frame::new(1.0e9)) {
            Advance::Finished {
                time,
                loops_completed,
            } => {
                // There, back, there, back, there
                assert_eq!(loops_completed, 4);
                assert_eq!(time, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_deltas() {
        let mut p = running(1.0);
        p.advance(&Frame::new(0.5));
        assert!(matches!(p.advance(&Frame::new(-3.0)), Advance::Update { .. }));
        assert!(matches!(p.advance(&Frame::new(f32::NAN)), Advance::Update { .. }));
        assert_eq!(p.elapsed(), 0.5);

        let mut looping = running(1.0);
        looping.set_loops(LoopType::Restart, -1, 0.0);
        looping.advance(&Frame::new(f32::INFINITY));
        assert!(looping.elapsed().is_finite());
        assert!(looping.is_running());
    }

    #[test]
    fn test_restart_restores_loops() {
        let mut p = running(1.0);
        p.set_loops(LoopType::Restart, 1, 0.0);
        p.advance(&Frame::new(1.0));
        assert!(matches!(p.advance(&Frame::new(1.0)), Advance::Finished { .. }));
        assert_eq!(p.loops_remaining(), 0);

        p.restart();
        assert_eq!(p.loops_remaining(), 1);
        assert!(matches!(
            p.advance(&Frame::new(1.0)),
            Advance::Update {
                loops_completed: 1,
                ..
            }
        ));
        assert!(matches!(p.advance(&Frame::new(1.0)), Advance::Finished { .. }));
    }

    #[test]
    fn test_unscaled_uses_raw_delta() {
        let mut p = running(1.0);
        p.set_unscaled(true);
        p.advance(&Frame::scaled(0.5, 0.0));
        assert!((p.time() - 0.5).abs() < 1e-6);
    }
}
