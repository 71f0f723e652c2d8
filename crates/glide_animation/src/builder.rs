//! Fluent construction of scheduled tweens
//!
//! ```rust
//! use glide_animation::{fn_target, Easing, LoopType, TweenScheduler};
//!
//! let mut scheduler = TweenScheduler::new();
//! let id = scheduler
//!     .tween(fn_target(|v: f32| println!("{v}")), 0.0, 1.0, 0.5)
//!     .ease(Easing::BackOut)
//!     .loops(LoopType::PingPong, 1, 0.0)
//!     .start()
//!     .unwrap();
//! assert!(scheduler.is_active(id));
//! ```

use crate::easing::{EaseCurve, Easing};
use crate::error::Result;
use crate::playback::LoopType;
use crate::scheduler::{TweenId, TweenScheduler};
use crate::spline_tween::SplineTween;
use crate::tween::Tween;
use crate::tweenable::{ContextId, Tweenable};
use crate::values::Interpolate;
use glide_core::Color;
use std::rc::Rc;

/// Settings every builder can apply, regardless of the value type
pub trait TweenSettings: Tweenable + Sized {
    fn apply_ease(&mut self, easing: Easing);

    fn apply_curve(&mut self, curve: Rc<EaseCurve>);

    fn apply_loops(&mut self, loop_type: LoopType, loops: i32, loop_delay: f32);

    fn apply_delay(&mut self, delay: f32);

    fn apply_relative(&mut self);

    fn apply_unscaled(&mut self, unscaled: bool);

    fn apply_completion_handler(&mut self, handler: Box<dyn FnMut(&Self)>);

    fn apply_loop_completion_handler(&mut self, handler: Box<dyn FnMut(&Self)>);
}

macro_rules! impl_tween_settings {
    ([$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*> TweenSettings for $ty {
            fn apply_ease(&mut self, easing: Easing) {
                self.set_ease(easing);
            }

            fn apply_curve(&mut self, curve: Rc<EaseCurve>) {
                self.set_curve(curve);
            }

            fn apply_loops(&mut self, loop_type: LoopType, loops: i32, loop_delay: f32) {
                self.set_loops(loop_type, loops, loop_delay);
            }

            fn apply_delay(&mut self, delay: f32) {
                self.set_delay(delay);
            }

            fn apply_relative(&mut self) {
                self.set_is_relative();
            }

            fn apply_unscaled(&mut self, unscaled: bool) {
                self.set_timescale_independent(unscaled);
            }

            fn apply_completion_handler(&mut self, handler: Box<dyn FnMut(&Self)>) {
                self.set_completion_handler(handler);
            }

            fn apply_loop_completion_handler(&mut self, handler: Box<dyn FnMut(&Self)>) {
                self.set_loop_completion_handler(handler);
            }
        }
    };
}

impl_tween_settings!([T: Interpolate] Tween<T>);
impl_tween_settings!([] SplineTween);

/// Builder returned by [`TweenScheduler::tween`] and
/// [`TweenScheduler::spline_tween`]
#[must_use = "a tween builder does nothing until `start` or `build` is called"]
pub struct TweenBuilder<'a, W: TweenSettings> {
    scheduler: &'a mut TweenScheduler,
    tween: Box<W>,
}

impl<'a, W: TweenSettings> TweenBuilder<'a, W> {
    pub(crate) fn new(scheduler: &'a mut TweenScheduler, tween: Box<W>) -> Self {
        Self { scheduler, tween }
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.tween.apply_ease(easing);
        self
    }

    /// Custom curve; overrides the ease kind
    pub fn curve(mut self, curve: Rc<EaseCurve>) -> Self {
        self.tween.apply_curve(curve);
        self
    }

    /// Loop forever
    pub fn looping(mut self, loop_type: LoopType, loop_delay: f32) -> Self {
        self.tween.apply_loops(loop_type, -1, loop_delay);
        self
    }

    /// Loop `loops` extra cycles, -1 for infinite
    pub fn loops(mut self, loop_type: LoopType, loops: i32, loop_delay: f32) -> Self {
        self.tween.apply_loops(loop_type, loops, loop_delay);
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.tween.apply_delay(delay);
        self
    }

    /// Treat the end value (or the path) as relative to the start
    pub fn relative(mut self) -> Self {
        self.tween.apply_relative();
        self
    }

    pub fn context(mut self, context: ContextId) -> Self {
        self.tween.set_context(Some(context));
        self
    }

    /// Advance with the raw frame delta, ignoring the time scale
    pub fn unscaled_time(mut self) -> Self {
        self.tween.apply_unscaled(true);
        self
    }

    pub fn on_complete(mut self, handler: impl FnMut(&W) + 'static) -> Self {
        self.tween.apply_completion_handler(Box::new(handler));
        self
    }

    pub fn on_loop_complete(mut self, handler: impl FnMut(&W) + 'static) -> Self {
        self.tween.apply_loop_completion_handler(Box::new(handler));
        self
    }

    /// Direct access for settings without a builder method
    pub fn tween_mut(&mut self) -> &mut W {
        &mut self.tween
    }

    /// Hand the tween to the scheduler
    pub fn start(self) -> Result<TweenId> {
        self.scheduler.add(self.tween)
    }

    /// Return the configured tween without scheduling it, e.g. for a chain
    pub fn build(self) -> Box<W> {
        self.tween
    }
}

impl<'a> TweenBuilder<'a, Tween<Color>> {
    /// Blend through hue instead of per channel
    pub fn hsv(mut self) -> Self {
        self.tween.set_use_hsv(true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::fn_target;
    use crate::tweenable::TweenControl;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_builder_applies_default_ease() {
        let mut scheduler = TweenScheduler::new();
        let tween = scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 1.0).build();
        assert_eq!(tween.playback().easing(), Easing::QuartIn);
    }

    #[test]
    fn test_builder_settings() {
        let mut scheduler = TweenScheduler::new();
        let tween = scheduler
            .tween(fn_target(|_: f32| {}), 2.0, 3.0, 1.0)
            .ease(Easing::SineOut)
            .loops(LoopType::Restart, 3, 0.1)
            .delay(0.5)
            .relative()
            .context(ContextId::new(9))
            .unscaled_time()
            .build();

        assert_eq!(tween.playback().easing(), Easing::SineOut);
        assert_eq!(tween.playback().loop_type(), LoopType::Restart);
        assert_eq!(tween.playback().loops_remaining(), 3);
        assert_eq!(tween.playback().delay(), 0.5);
        assert!(tween.playback().is_unscaled());
        assert_eq!(*tween.to(), 5.0);
        assert_eq!(tween.context(), Some(ContextId::new(9)));
    }

    #[test]
    fn test_hsv_builder() {
        let mut scheduler = TweenScheduler::new();
        let seen = Rc::new(RefCell::new(Color::BLACK));
        let sink = Rc::clone(&seen);
        scheduler
            .tween(fn_target(move |c: Color| *sink.borrow_mut() = c), Color::RED, Color::BLUE, 1.0)
            .ease(Easing::Linear)
            .hsv()
            .start()
            .unwrap();
        scheduler.advance(0.5);
        // Red to blue through the shortest hue arc passes magenta
        assert!(seen.borrow().approx_eq(&Color::rgb(1.0, 0.0, 1.0), 1e-3));
    }

    #[test]
    fn test_on_complete_receives_tween() {
        let mut scheduler = TweenScheduler::new();
        let last = Rc::new(Cell::new(0.0f32));
        let sink = Rc::clone(&last);
        scheduler
            .tween(fn_target(|_: f32| {}), 0.0, 4.0, 0.1)
            .on_complete(move |t| sink.set(*t.current()))
            .start()
            .unwrap();
        scheduler.advance(1.0);
        assert_eq!(last.get(), 4.0);
    }
}
