//! Glide Animation System
//!
//! Frame-driven tweening: typed values are interpolated from a start to an
//! end over a duration and pushed into targets once per frame.
//!
//! # Features
//!
//! - **Easing**: the classic Penner curves, CSS cubic-bezier and sampled custom curves
//! - **Tweens**: one generic `Tween<T>` for scalars, vectors, colors and rotations
//! - **Splines**: Catmull-Rom paths with arc-length parameterization
//! - **Chains**: sequential playback of any animatables
//! - **Pooling**: finished animations are recycled per type, bounded
//! - **Scheduler**: one owner advancing everything, with a fluent builder
//!
//! # Example
//!
//! ```rust
//! use glide_animation::{Easing, SharedTarget, TweenScheduler};
//! use glide_core::Vec3;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let position = Rc::new(RefCell::new(Vec3::ZERO));
//! let mut scheduler = TweenScheduler::new();
//!
//! let spline = scheduler
//!     .spline(vec![Vec3::ZERO, Vec3::new(5.0, 5.0, 0.0), Vec3::new(10.0, 0.0, 0.0)])
//!     .unwrap();
//! scheduler
//!     .spline_tween(SharedTarget::new(Rc::clone(&position)), spline, Vec3::ZERO, 2.0)
//!     .ease(Easing::SineInOut)
//!     .start()
//!     .unwrap();
//!
//! while scheduler.active_count() > 0 {
//!     scheduler.advance(1.0 / 60.0);
//! }
//! assert_eq!(*position.borrow(), Vec3::new(10.0, 0.0, 0.0));
//! ```

pub mod builder;
pub mod chain;
pub mod config;
pub mod easing;
pub mod error;
pub mod global;
pub mod playback;
pub mod pool;
pub mod scheduler;
pub mod spline;
pub mod spline_tween;
pub mod target;
pub mod tween;
pub mod tweenable;
pub mod values;

pub use builder::{TweenBuilder, TweenSettings};
pub use chain::TweenChain;
pub use config::SchedulerConfig;
pub use easing::{ease, ease_progress, ease_with_curve, CurveKey, EaseCurve, Easing};
pub use error::{Result, TweenError};
pub use playback::{LoopType, Playback, TweenState};
pub use pool::TweenPool;
pub use scheduler::{TweenId, TweenScheduler};
pub use spline::{Spline, SplineKind};
pub use spline_tween::SplineTween;
pub use target::{fn_target, CameraProperty, CameraTarget, FnTarget, SharedTarget, TweenTarget, WeakTarget};
pub use tween::Tween;
pub use tweenable::{ContextId, Frame, TweenControl, Tweenable};
pub use values::Interpolate;
