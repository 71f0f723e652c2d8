//! Typed tweens
//!
//! `Tween<T>` animates one `Interpolate` value from a start to an end and
//! pushes the result into a `TweenTarget<T>` every frame. Timing lives in
//! [`Playback`]; this type adds values, handlers and the target.

use crate::easing::{EaseCurve, Easing};
use crate::error::{Result, TweenError};
use crate::playback::{
    Advance, LoopType, Playback, TweenState, DEFAULT_MIN_DURATION, MAX_LOOP_EVENTS_PER_FRAME,
};
use crate::pool::TweenPool;
use crate::target::TweenTarget;
use crate::tweenable::{ContextId, Frame, TweenControl, Tweenable};
use crate::values::Interpolate;
use glide_core::Color;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Handler invoked with the tween that triggered it
pub type TweenHandler<T> = Box<dyn FnMut(&Tween<T>)>;

/// Replacement for `Interpolate::lerp`, e.g. HSV blending for colors
pub type Interpolator<T> = fn(&T, &T, f32) -> T;

/// A single typed animation
pub struct Tween<T: Interpolate> {
    target: Option<Box<dyn TweenTarget<T>>>,
    from: T,
    to: T,
    current: T,
    playback: Playback,
    is_relative: bool,
    relative_applied: bool,
    interpolator: Option<Interpolator<T>>,
    on_complete: Option<TweenHandler<T>>,
    on_loop_complete: Option<TweenHandler<T>>,
    context: Option<ContextId>,
    babysitter: bool,
}

impl<T: Interpolate> Default for Tween<T> {
    fn default() -> Self {
        Self {
            target: None,
            from: T::default(),
            to: T::default(),
            current: T::default(),
            playback: Playback::default(),
            is_relative: false,
            relative_applied: false,
            interpolator: None,
            on_complete: None,
            on_loop_complete: None,
            context: None,
            babysitter: false,
        }
    }
}

impl<T: Interpolate> Tween<T> {
    pub fn new(target: Box<dyn TweenTarget<T>>, from: T, to: T, duration: f32) -> Self {
        let mut tween = Self::default();
        tween.initialize(target, from, to, duration);
        tween
    }

    /// Reset every field and start running
    pub fn initialize(&mut self, target: Box<dyn TweenTarget<T>>, from: T, to: T, duration: f32) {
        self.prepare(target, from, to, duration, DEFAULT_MIN_DURATION);
    }

    pub(crate) fn prepare(
        &mut self,
        target: Box<dyn TweenTarget<T>>,
        from: T,
        to: T,
        duration: f32,
        min_duration: f32,
    ) {
        self.recycle_self();
        self.target = Some(target);
        self.current = from.clone();
        self.from = from;
        self.to = to;
        self.is_relative = false;
        self.relative_applied = false;
        self.babysitter = false;
        self.playback.reset(duration, min_duration);
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_ease(&mut self, easing: Easing) -> &mut Self {
        self.playback.set_easing(easing);
        self
    }

    /// Use a custom curve instead of the ease kind
    pub fn set_curve(&mut self, curve: Rc<EaseCurve>) -> &mut Self {
        self.playback.set_curve(Some(curve));
        self
    }

    /// Loop forever
    pub fn set_loop(&mut self, loop_type: LoopType, loop_delay: f32) -> &mut Self {
        self.playback.set_loops(loop_type, -1, loop_delay);
        self
    }

    /// Loop `loops` extra cycles, -1 for infinite
    pub fn set_loops(&mut self, loop_type: LoopType, loops: i32, loop_delay: f32) -> &mut Self {
        self.playback.set_loops(loop_type, loops, loop_delay);
        self
    }

    pub fn set_delay(&mut self, delay: f32) -> &mut Self {
        self.playback.set_delay(delay);
        self
    }

    /// Set the duration, clamping anything shorter than `min_duration`
    pub fn set_duration(&mut self, duration: f32, min_duration: f32) -> &mut Self {
        self.playback.set_duration(duration, min_duration);
        self
    }

    /// Treat `to` as an offset from `from`
    ///
    /// Applied once; calling again does not compound the offset.
    pub fn set_is_relative(&mut self) -> &mut Self {
        self.is_relative = true;
        if !self.relative_applied {
            self.to = self.from.offset(&self.to);
            self.relative_applied = true;
        }
        self
    }

    pub fn set_completion_handler(&mut self, handler: impl FnMut(&Tween<T>) + 'static) -> &mut Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    pub fn set_loop_completion_handler(
        &mut self,
        handler: impl FnMut(&Tween<T>) + 'static,
    ) -> &mut Self {
        self.on_loop_complete = Some(Box::new(handler));
        self
    }

    pub fn set_timescale_independent(&mut self, unscaled: bool) -> &mut Self {
        self.playback.set_unscaled(unscaled);
        self
    }

    pub fn set_interpolator(&mut self, interpolator: Option<Interpolator<T>>) -> &mut Self {
        self.interpolator = interpolator;
        self
    }

    pub fn set_target(&mut self, target: Box<dyn TweenTarget<T>>) -> &mut Self {
        self.target = Some(target);
        self
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Run the rest of the current leg backwards
    pub fn reverse(&mut self) {
        self.playback.reverse();
    }

    /// Move the clock and push the value at the new position
    pub fn jump_to_elapsed_time(&mut self, elapsed: f32) {
        self.playback.jump_to(elapsed);
        let time = self.playback.time();
        self.push(time);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn from(&self) -> &T {
        &self.from
    }

    pub fn to(&self) -> &T {
        &self.to
    }

    /// Last value pushed to the target
    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn state(&self) -> TweenState {
        self.playback.state()
    }

    pub fn elapsed(&self) -> f32 {
        self.playback.elapsed()
    }

    pub fn duration(&self) -> f32 {
        self.playback.duration()
    }

    pub fn is_relative(&self) -> bool {
        self.is_relative
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Value at an effective time
    pub fn value_at(&self, time: f32) -> T {
        let progress = self.playback.progress(time);
        match self.interpolator {
            Some(interpolate) => interpolate(&self.from, &self.to, progress),
            None => self.from.lerp(&self.to, progress),
        }
    }

    fn push(&mut self, time: f32) {
        self.current = self.value_at(time);
        let Some(target) = self.target.as_mut() else {
            return;
        };
        if self.babysitter && !target.is_valid() {
            trace!("babysitter skipped push to invalid target");
            return;
        }
        target.set_tweened_value(self.current.clone());
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

impl Tween<Color> {
    /// Blend colors through hue instead of per channel
    pub fn set_use_hsv(&mut self, hsv: bool) -> &mut Self {
        self.interpolator = if hsv {
            Some(|a: &Color, b: &Color, t: f32| a.lerp_hsv(b, t))
        } else {
            None
        };
        self
    }
}

impl<T: Interpolate> TweenControl for Tween<T> {
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

impl<T: Interpolate> Tweenable for Tween<T> {
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
        self.on_complete = None;
        self.on_loop_complete = None;
        self.interpolator = None;
        self.context = None;
        self.playback.set_curve(None);
    }

    fn release(mut self: Box<Self>, pool: &mut TweenPool) {
        self.recycle_self();
        pool.release(self);
    }

    fn validate(&self) -> Result<()> {
        if self.target.is_none() {
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

impl<T: Interpolate + fmt::Debug> fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("current", &self.current)
            .field("playback", &self.playback)
            .field("is_relative", &self.is_relative)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
