//! Capabilities shared by everything the scheduler can drive
//!
//! `TweenControl` is the small control surface handed out by context
//! queries; `Tweenable` adds the per-frame tick and the recycling hooks the
//! scheduler needs to own an instance.

use crate::error::Result;
use crate::pool::TweenPool;
use std::any::Any;

/// Time step handed to every animatable on one scheduler advance
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    /// Time-scaled delta in seconds
    pub delta: f32,
    /// Raw delta in seconds, ignoring the scheduler's time scale
    pub unscaled_delta: f32,
    /// Skip pushes to targets that report themselves invalid
    pub babysitter: bool,
}

impl Frame {
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            unscaled_delta: delta,
            babysitter: false,
        }
    }

    /// Frame for a given raw delta and time scale
    pub fn scaled(unscaled_delta: f32, time_scale: f32) -> Self {
        Self {
            delta: unscaled_delta * time_scale,
            unscaled_delta,
            babysitter: false,
        }
    }

    pub fn with_babysitter(mut self, enabled: bool) -> Self {
        self.babysitter = enabled;
        self
    }

    /// Delta to apply, honoring time-scale independence
    pub fn delta_for(&self, unscaled: bool) -> f32 {
        if unscaled {
            self.unscaled_delta
        } else {
            self.delta
        }
    }
}

/// Opaque grouping key used to find and stop related animations
///
/// The scheduler only compares context ids; it never dereferences them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Derive a context from the address of a value
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize as u64)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ContextId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Control surface exposed for running animations
pub trait TweenControl {
    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// True while the animation has not completed, paused or not
    fn is_running(&self) -> bool;

    /// Terminate the animation
    ///
    /// With `bring_to_completion` the final value is pushed before stopping.
    /// Either way the next tick reports the animation as finished.
    fn stop(&mut self, bring_to_completion: bool);

    fn context(&self) -> Option<ContextId>;

    fn set_context(&mut self, context: Option<ContextId>);
}

/// An animatable the scheduler can own, tick and recycle
pub trait Tweenable: TweenControl + Any {
    /// Advance by one frame. Returns `true` when finished and ready for
    /// removal; a finished instance keeps returning `true` without side
    /// effects.
    fn tick(&mut self, frame: &Frame) -> bool;

    /// Rewind to the start, keeping values, handlers and loop settings
    fn restart(&mut self);

    /// Clear references to targets, handlers and contexts
    fn recycle_self(&mut self);

    /// Recycle and hand the allocation back to the pool
    fn release(self: Box<Self>, pool: &mut TweenPool);

    /// Check the instance can be scheduled
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn as_control(&mut self) -> &mut dyn TweenControl;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_delta_for() {
        let frame = Frame::scaled(0.1, 0.5);
        assert!((frame.delta_for(false) - 0.05).abs() < 1e-6);
        assert_eq!(frame.delta_for(true), 0.1);
        assert!(!frame.babysitter);
        assert!(frame.with_babysitter(true).babysitter);
    }

    #[test]
    fn test_context_of_is_address_based() {
        let a = 1u32;
        let b = 1u32;
        assert_eq!(ContextId::of(&a), ContextId::of(&a));
        assert_ne!(ContextId::of(&a), ContextId::of(&b));
        assert_eq!(ContextId::from(7), ContextId::new(7));
    }
}
