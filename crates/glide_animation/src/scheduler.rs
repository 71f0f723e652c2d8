//! Tween scheduler
//!
//! Owns every active animation and advances them once per frame. Finished
//! animations are removed and their allocations recycled through the pool.
//!
//! # Example
//!
//! ```rust
//! use glide_animation::{Easing, SharedTarget, TweenScheduler};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let value = Rc::new(RefCell::new(0.0f32));
//! let mut scheduler = TweenScheduler::new();
//! scheduler
//!     .tween(SharedTarget::new(Rc::clone(&value)), 0.0, 10.0, 1.0)
//!     .ease(Easing::Linear)
//!     .start()
//!     .unwrap();
//!
//! scheduler.advance(0.5);
//! assert!((*value.borrow() - 5.0).abs() < 1e-5);
//! scheduler.advance(0.5);
//! assert_eq!(*value.borrow(), 10.0);
//! assert_eq!(scheduler.active_count(), 0);
//! ```

use crate::builder::TweenBuilder;
use crate::chain::TweenChain;
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::pool::TweenPool;
use crate::spline::Spline;
use crate::spline_tween::SplineTween;
use crate::target::TweenTarget;
use crate::tween::Tween;
use crate::tweenable::{ContextId, Frame, TweenControl, Tweenable};
use crate::values::Interpolate;
use glide_core::Vec3;
use slotmap::{new_key_type, SlotMap};
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

new_key_type! {
    /// Handle to a scheduled animation; stale once it finishes or is removed
    pub struct TweenId;
}

/// The scheduler that ticks all active animations
pub struct TweenScheduler {
    config: SchedulerConfig,
    tweens: SlotMap<TweenId, Box<dyn Tweenable>>,
    /// Update order; iterated back to front
    active: Vec<TweenId>,
    pool: TweenPool,
    time_scale: f32,
    last_frame: Instant,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            pool: TweenPool::with_capacity(config.pool_capacity),
            time_scale: config.time_scale,
            config,
            tweens: SlotMap::with_key(),
            active: Vec::new(),
            last_frame: Instant::now(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Scale applied to every frame delta, except for unscaled tweens
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    pub fn set_babysitter(&mut self, enabled: bool) {
        self.config.babysitter = enabled;
    }

    pub fn pool(&self) -> &TweenPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut TweenPool {
        &mut self.pool
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Schedule an animation
    ///
    /// Invalid animations (no target) are released back to the pool and
    /// rejected. Adding the same instance twice is not detected.
    pub fn add(&mut self, tween: Box<dyn Tweenable>) -> Result<TweenId> {
        if let Err(err) = tween.validate() {
            warn!(%err, "rejected tween");
            tween.release(&mut self.pool);
            return Err(err);
        }
        let id = self.tweens.insert(tween);
        self.active.push(id);
        Ok(id)
    }

    /// Advance every active animation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let frame = Frame::scaled(dt, self.time_scale).with_babysitter(self.config.babysitter);

        // Back to front, so swap_remove only moves entries already ticked
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let finished = match self.tweens.get_mut(self.active[i]) {
                Some(tween) => tween.tick(&frame),
                None => true,
            };
            if finished {
                self.remove_at(i);
            }
        }
    }

    /// Advance by the wall-clock time since the previous call
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(dt);
    }

    /// Remove the entry at `index` of the update order and recycle it
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.active.len() {
            return false;
        }
        let id = self.active.swap_remove(index);
        match self.tweens.remove(id) {
            Some(tween) => {
                tween.release(&mut self.pool);
                true
            }
            None => false,
        }
    }

    /// Remove an animation without completing it
    pub fn remove(&mut self, id: TweenId) -> bool {
        match self.active.iter().position(|&active| active == id) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    /// Stop every animation. They are removed on the next advance.
    pub fn stop_all(&mut self, bring_to_completion: bool) {
        for tween in self.tweens.values_mut() {
            tween.stop(bring_to_completion);
        }
    }

    /// Remove and recycle every animation without completing them
    pub fn clear(&mut self) {
        debug!(count = self.active.len(), "clearing scheduler");
        for id in self.active.drain(..) {
            if let Some(tween) = self.tweens.remove(id) {
                tween.release(&mut self.pool);
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(id)
    }

    /// Update order of the active animations
    pub fn ids(&self) -> &[TweenId] {
        &self.active
    }

    pub fn control(&mut self, id: TweenId) -> Option<&mut dyn TweenControl> {
        self.tweens.get_mut(id).map(|tween| tween.as_control())
    }

    /// Concrete access to a scheduled animation
    pub fn get_mut<W: Tweenable>(&mut self, id: TweenId) -> Option<&mut W> {
        self.tweens.get_mut(id)?.as_any_mut().downcast_mut::<W>()
    }

    pub fn tween_mut<T: Interpolate>(&mut self, id: TweenId) -> Option<&mut Tween<T>> {
        self.get_mut::<Tween<T>>(id)
    }

    /// Animations tagged with `context`, in update order
    pub fn ids_with_context(&self, context: ContextId) -> Vec<TweenId> {
        self.active
            .iter()
            .copied()
            .filter(|&id| {
                self.tweens
                    .get(id)
                    .is_some_and(|tween| tween.context() == Some(context))
            })
            .collect()
    }

    pub fn tweens_with_context(&mut self, context: ContextId) -> Vec<&mut dyn TweenControl> {
        self.tweens
            .values_mut()
            .filter(|tween| tween.context() == Some(context))
            .map(|tween| tween.as_control())
            .collect()
    }

    pub fn stop_all_with_context(&mut self, context: ContextId, bring_to_completion: bool) {
        for tween in self.tweens_with_context(context) {
            tween.stop(bring_to_completion);
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Start building a typed tween from the pool
    pub fn tween<T: Interpolate>(
        &mut self,
        target: impl TweenTarget<T> + 'static,
        from: T,
        to: T,
        duration: f32,
    ) -> TweenBuilder<'_, Tween<T>> {
        let mut tween = self.pool.acquire::<Tween<T>>();
        tween.prepare(Box::new(target), from, to, duration, self.config.min_duration);
        tween.set_ease(self.config.default_ease);
        TweenBuilder::new(self, tween)
    }

    /// Start building a tween along `spline` from the pool
    pub fn spline_tween(
        &mut self,
        target: impl TweenTarget<Vec3> + 'static,
        spline: Rc<Spline>,
        start: Vec3,
        duration: f32,
    ) -> TweenBuilder<'_, SplineTween> {
        let mut tween = self.pool.acquire::<SplineTween>();
        tween.prepare(Box::new(target), spline, start, duration, self.config.min_duration);
        tween.set_ease(self.config.default_ease);
        TweenBuilder::new(self, tween)
    }

    /// An empty chain from the pool, to be filled and passed to `add`
    pub fn chain(&mut self) -> Box<TweenChain> {
        let mut chain = self.pool.acquire::<TweenChain>();
        chain.recycle_self();
        chain
    }

    /// A spline at the configured path resolution
    pub fn spline(&self, points: impl Into<Vec<Vec3>>) -> Result<Rc<Spline>> {
        Ok(Rc::new(Spline::with_resolution(
            points,
            self.config.path_resolution,
        )?))
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TweenScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenScheduler")
            .field("active", &self.active.len())
            .field("time_scale", &self.time_scale)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::error::TweenError;
    use crate::target::{fn_target, SharedTarget};
    use std::cell::RefCell;

    #[test]
    fn test_add_rejects_missing_target() {
        let mut scheduler = TweenScheduler::new();
        let err = scheduler.add(Box::new(Tween::<f32>::default())).unwrap_err();
        assert!(matches!(err, TweenError::MissingTarget));
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.pool().pooled::<Tween<f32>>(), 1);
    }

    #[test]
    fn test_add_rejects_uninitialized_tween() {
        let mut scheduler = TweenScheduler::new();
        let mut tween = Box::new(Tween::<f32>::default());
        tween.set_target(fn_target(|_: f32| {}));
        let err = scheduler.add(tween).unwrap_err();
        assert!(matches!(err, TweenError::NotInitialized));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_finished_tweens_are_recycled() {
        let mut scheduler = TweenScheduler::new();
        let id = scheduler
            .tween(fn_target(|_: f32| {}), 0.0, 1.0, 0.1)
            .start()
            .unwrap();
        scheduler.advance(1.0);
        assert!(!scheduler.is_active(id));
        assert!(scheduler.control(id).is_none());
        assert_eq!(scheduler.pool().pooled::<Tween<f32>>(), 1);

        scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 0.1).start().unwrap();
        assert_eq!(scheduler.pool().pooled::<Tween<f32>>(), 0);
    }

    #[test]
    fn test_time_scale() {
        let value = Rc::new(RefCell::new(0.0f32));
        let mut scheduler = TweenScheduler::new();
        scheduler
            .tween(SharedTarget::new(Rc::clone(&value)), 0.0, 10.0, 1.0)
            .ease(Easing::Linear)
            .start()
            .unwrap();
        scheduler.set_time_scale(0.5);
        scheduler.advance(1.0);
        assert!((*value.borrow() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_unscaled_tween_ignores_time_scale() {
        let value = Rc::new(RefCell::new(0.0f32));
        let mut scheduler = TweenScheduler::new();
        scheduler
            .tween(SharedTarget::new(Rc::clone(&value)), 0.0, 10.0, 1.0)
            .ease(Easing::Linear)
            .unscaled_time()
            .start()
            .unwrap();
        scheduler.set_time_scale(0.0);
        scheduler.advance(0.5);
        assert!((*value.borrow() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut scheduler = TweenScheduler::new();
        let a = scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 1.0).start().unwrap();
        let b = scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 1.0).start().unwrap();
        assert!(scheduler.remove(a));
        assert!(!scheduler.remove(a));
        assert!(scheduler.is_active(b));
        scheduler.clear();
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_active(b));
    }

    #[test]
    fn test_stop_all_removes_on_next_advance() {
        let mut scheduler = TweenScheduler::new();
        scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 5.0).start().unwrap();
        scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 5.0).start().unwrap();
        scheduler.stop_all(false);
        assert_eq!(scheduler.active_count(), 2);
        scheduler.advance(0.0);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_tween_mut_downcasts() {
        let mut scheduler = TweenScheduler::new();
        let id = scheduler.tween(fn_target(|_: f32| {}), 1.0, 2.0, 1.0).start().unwrap();
        assert!(scheduler.tween_mut::<Vec3>(id).is_none());
        let tween = scheduler.tween_mut::<f32>(id).unwrap();
        assert_eq!(*tween.to(), 2.0);
    }

    #[test]
    fn test_config_duration_floor() {
        let config = SchedulerConfig {
            min_duration: 0.25,
            ..SchedulerConfig::default()
        };
        let mut scheduler = TweenScheduler::with_config(config);
        let tween = scheduler.tween(fn_target(|_: f32| {}), 0.0, 1.0, 0.0).build();
        assert_eq!(tween.duration(), 0.25);
    }
}
