//! Process-wide scheduler
//!
//! Convenience slot for hosts that want a single scheduler without passing
//! it around. Animations hold `Rc`s and closures, so the slot is per thread:
//! install it on the thread that drives frames.
//!
//! ```rust
//! use glide_animation::{global, fn_target};
//!
//! global::with_scheduler(|s| {
//!     s.tween(fn_target(|_: f32| {}), 0.0, 1.0, 0.25).start().unwrap();
//! })
//! .unwrap();
//! global::with_scheduler(|s| s.advance(1.0 / 60.0)).unwrap();
//! global::shutdown();
//! ```

use crate::config::SchedulerConfig;
use crate::error::{Result, TweenError};
use crate::scheduler::TweenScheduler;
use std::cell::RefCell;
use tracing::debug;

std::thread_local! {
    static SCHEDULER: RefCell<Option<TweenScheduler>> = const { RefCell::new(None) };
}

/// Install a scheduler with `config`, replacing any existing one
///
/// Animations of a replaced scheduler are dropped without completing.
pub fn init(config: SchedulerConfig) -> Result<()> {
    SCHEDULER.with(|slot| {
        let mut slot = slot.try_borrow_mut().map_err(|_| TweenError::SchedulerBusy)?;
        debug!(?config, "global scheduler initialized");
        *slot = Some(TweenScheduler::with_config(config));
        Ok(())
    })
}

/// Run `f` with the scheduler, creating a default one on first use
///
/// Fails with `SchedulerBusy` when called from inside another
/// `with_scheduler` call, e.g. from a completion handler.
pub fn with_scheduler<R>(f: impl FnOnce(&mut TweenScheduler) -> R) -> Result<R> {
    SCHEDULER.with(|slot| {
        let mut slot = slot.try_borrow_mut().map_err(|_| TweenError::SchedulerBusy)?;
        let scheduler = slot.get_or_insert_with(|| {
            debug!("global scheduler created on first use");
            TweenScheduler::new()
        });
        Ok(f(scheduler))
    })
}

/// Drop the scheduler and every animation it owns
pub fn shutdown() {
    SCHEDULER.with(|slot| {
        if let Ok(mut slot) = slot.try_borrow_mut() {
            if slot.take().is_some() {
                debug!("global scheduler shut down");
            }
        }
    });
}

pub fn is_initialized() -> bool {
    SCHEDULER.with(|slot| slot.try_borrow().map(|s| s.is_some()).unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    #[test]
    fn test_lazy_creation_and_shutdown() {
        shutdown();
        assert!(!is_initialized());
        let count = with_scheduler(|s| s.active_count()).unwrap();
        assert_eq!(count, 0);
        assert!(is_initialized());
        shutdown();
        assert!(!is_initialized());
    }

    #[test]
    fn test_init_uses_config() {
        init(SchedulerConfig::default().with_default_ease(Easing::BounceOut)).unwrap();
        let ease = with_scheduler(|s| s.config().default_ease).unwrap();
        assert_eq!(ease, Easing::BounceOut);
        shutdown();
    }

    #[test]
    fn test_reentrant_access_is_busy() {
        let inner = with_scheduler(|_| with_scheduler(|_| ())).unwrap();
        assert!(matches!(inner, Err(TweenError::SchedulerBusy)));
        shutdown();
    }
}
