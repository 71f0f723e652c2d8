//! Tweens that move a point along a spline

use crate::easing::{EaseCurve, Easing};
use crate::error::{Result, TweenError};
use crate::playback::{
    Advance, LoopType, Playback, TweenState, DEFAULT_MIN_DURATION, MAX_LOOP_EVENTS_PER_FRAME,
};
use crate::pool::TweenPool;
use crate::spline::Spline;
use crate::target::TweenTarget;
use crate::tweenable::{ContextId, Frame, TweenControl, Tweenable};
use glide_core::Vec3;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Handler invoked when a spline tween completes
pub type SplineHandler = Box<dyn FnMut(&SplineTween)>;

/// Drives a `Vec3` target along a shared spline
///
/// Eased progress is mapped to arc length, so a linear ease moves at
/// constant speed. In relative mode every path point is offset by the start
/// position.
#[derive(Default)]
pub struct SplineTween {
    target: Option<Box<dyn TweenTarget<Vec3>>>,
    spline: Option<Rc<Spline>>,
    start: Vec3,
    current: Vec3,
    is_relative: bool,
    playback: Playback,
    on_complete: Option<SplineHandler>,
    on_loop_complete: Option<SplineHandler>,
    context: Option<ContextId>,
    babysitter: bool,
}

impl SplineTween {
    pub fn new(
        target: Box<dyn TweenTarget<Vec3>>,
        spline: Rc<Spline>,
        start: Vec3,
        duration: f32,
    ) -> Self {
        let mut tween = Self::default();
        tween.initialize(target, spline, start, duration);
        tween
    }

    /// Reset every field and start running. Builds the spline's path.
    pub fn initialize(
        &mut self,
        target: Box<dyn TweenTarget<Vec3>>,
        spline: Rc<Spline>,
        start: Vec3,
        duration: f32,
    ) {
        self.prepare(target, spline, start, duration, DEFAULT_MIN_DURATION);
    }

    pub(crate) fn prepare(
        &mut self,
        target: Box<dyn TweenTarget<Vec3>>,
        spline: Rc<Spline>,
        start: Vec3,
        duration: f32,
        min_duration: f32,
    ) {
        self.recycle_self();
        spline.build_path();
        self.target = Some(target);
        self.spline = Some(spline);
        self.start = start;
        self.current = start;
        self.is_relative = false;
        self.babysitter = false;
        self.playback.reset(duration, min_duration);
    }

    pub fn set_ease(&mut self, easing: Easing) -> &mut Self {
        self.playback.set_easing(easing);
        self
    }

    pub fn set_curve(&mut self, curve: Rc<EaseCurve>) -> &mut Self {
        self.playback.set_curve(Some(curve));
        self
    }

    pub fn set_loops(&mut self, loop_type: LoopType, loops: i32, loop_delay: f32) -> &mut Self {
        self.playback.set_loops(loop_type, loops, loop_delay);
        self
    }

    pub fn set_delay(&mut self, delay: f32) -> &mut Self {
        self.playback.set_delay(delay);
        self
    }

    pub fn set_duration(&mut self, duration: f32, min_duration: f32) -> &mut Self {
        self.playback.set_duration(duration, min_duration);
        self
    }

    /// Offset every path point by the start position
    pub fn set_is_relative(&mut self) -> &mut Self {
        self.is_relative = true;
        self
    }

    pub fn set_timescale_independent(&mut self, unscaled: bool) -> &mut Self {
        self.playback.set_unscaled(unscaled);
        self
    }

    pub fn set_completion_handler(&mut self, handler: impl FnMut(&SplineTween) + 'static) -> &mut Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    pub fn set_loop_completion_handler(
        &mut self,
        handler: impl FnMut(&SplineTween) + 'static,
    ) -> &mut Self {
        self.on_loop_complete = Some(Box::new(handler));
        self
    }

    pub fn spline(&self) -> Option<&Rc<Spline>> {
        self.spline.as_ref()
    }

    pub fn current(&self) -> Vec3 {
        self.current
    }

    pub fn state(&self) -> TweenState {
        self.playback.state()
    }

    pub fn is_relative(&self) -> bool {
        self.is_relative
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Position at an effective time
    pub fn value_at(&self, time: f32) -> Vec3 {
        let Some(spline) = &self.spline else {
            return self.start;
        };
        let point = spline.point_on_path(self.playback.progress(time));
        if self.is_relative {
            point + self.start
        } else {
            point
        }
    }

    fn push(&mut self, time: f32) {
        self.current = self.value_at(time);
        let Some(target) = self.target.as_mut() else {
            return;
        };
        if self.babysitter && !target.is_valid() {
            trace!("babysitter skipped spline push to invalid target");
            return;
        }
        target.set_tweened_value(self.current);
    }

    fn fire_loop_complete(&mut self, loops: u32) {
        for _ in 0..loops.min(MAX_LOOP_EVENTS_PER_FRAME) {
            if let Some(mut handler) = self.on_loop_complete.take() {
                handler(self);
                if self.on_loop_complete.is_none() {
                    self.on_loop_complete = Some(handler);
                }
            }
        }
    }

    fn fire_complete(&mut self) {
        if let Some(mut handler) = self.on_complete.take() {
            handler(self);
            if self.on_complete.is_none() {
                self.on_complete = Some(handler);
            }
        }
    }
}

impl TweenControl for SplineTween {
    fn pause(&mut self) {
        self.playback.pause();
    }

    fn resume(&mut self) {
        self.playback.resume();
    }

    fn is_paused(&self) -> bool {
        self.playback.is_paused()
    }

    fn is_running(&self) -> bool {
        self.playback.is_running()
    }

    fn stop(&mut self, bring_to_completion: bool) {
        if self.playback.is_completed() {
            return;
        }
        if bring_to_completion {
            let time = self.playback.finish();
            self.push(time);
            self.fire_complete();
        } else {
            self.playback.terminate();
        }
    }

    fn context(&self) -> Option<ContextId> {
        self.context
    }

    fn set_context(&mut self, context: Option<ContextId>) {
        self.context = context;
    }
}

impl Tweenable for SplineTween {
    fn tick(&mut self, frame: &Frame) -> bool {
        if self.playback.is_completed() {
            return true;
        }
        self.babysitter = frame.babysitter;

        match self.playback.advance(frame) {
            Advance::Idle => false,
            Advance::Update {
                time,
                loops_completed,
            } => {
                self.push(time);
                self.fire_loop_complete(loops_completed);
                false
            }
            Advance::Finished {
                time,
                loops_completed,
            } => {
                self.push(time);
                self.fire_loop_complete(loops_completed);
                self.fire_complete();
                true
            }
        }
    }

    fn restart(&mut self) {
        self.playback.restart();
    }

    fn recycle_self(&mut self) {
        self.target = None;
        self.spline = None;
        self.on_complete = None;
        self.on_loop_complete = None;
        self.context = None;
        self.playback.set_curve(None);
    }

    fn release(mut self: Box<Self>, pool: &mut TweenPool) {
        self.recycle_self();
        pool.release(self);
    }

    fn validate(&self) -> Result<()> {
        if self.target.is_none() || self.spline.is_none() {
            return Err(TweenError::MissingTarget);
        }
        if self.playback.state() == TweenState::Idle {
            return Err(TweenError::NotInitialized);
        }
        Ok(())
    }

    fn as_control(&mut self) -> &mut dyn TweenControl {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for SplineTween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplineTween")
            .field("start", &self.start)
            .field("current", &self.current)
            .field("is_relative", &self.is_relative)
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::SharedTarget;
    use std::cell::RefCell;

    fn straight_x() -> Rc<Spline> {
        Rc::new(Spline::straight(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]).unwrap())
    }

    #[test]
    fn test_moves_along_path() {
        let cell = Rc::new(RefCell::new(Vec3::ZERO));
        let target = Box::new(SharedTarget::new(Rc::clone(&cell)));
        let mut tween = SplineTween::new(target, straight_x(), Vec3::ZERO, 2.0);

        assert!(!tween.tick(&Frame::new(1.0)));
        assert!((cell.borrow().x - 5.0).abs() < 1e-4);
        assert!(tween.tick(&Frame::new(1.0)));
        assert_eq!(*cell.borrow(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_relative_offsets_path() {
        let cell = Rc::new(RefCell::new(Vec3::ZERO));
        let target = Box::new(SharedTarget::new(Rc::clone(&cell)));
        let start = Vec3::new(0.0, 5.0, 0.0);
        let mut tween = SplineTween::new(target, straight_x(), start, 1.0);
        tween.set_is_relative();

        tween.tick(&Frame::new(1.0));
        assert_eq!(*cell.borrow(), Vec3::new(10.0, 5.0, 0.0));
    }

    #[test]
    fn test_stop_bring_lands_on_end() {
        let cell = Rc::new(RefCell::new(Vec3::ZERO));
        let target = Box::new(SharedTarget::new(Rc::clone(&cell)));
        let mut tween = SplineTween::new(target, straight_x(), Vec3::ZERO, 4.0);
        tween.tick(&Frame::new(1.0));
        tween.stop(true);
        assert_eq!(*cell.borrow(), Vec3::new(10.0, 0.0, 0.0));
        assert!(tween.tick(&Frame::new(1.0)));
    }

    #[test]
    fn test_validate_requires_spline() {
        let tween = SplineTween::default();
        assert!(tween.validate().is_err());
    }
}
