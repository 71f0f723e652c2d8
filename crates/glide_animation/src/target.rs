//! Tween targets
//!
//! A target is whatever receives the interpolated value each frame. The
//! engine only needs two things from it: accept a value, and say whether it
//! is still alive (checked when the babysitter is on).

use glide_core::{Camera, Color};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Receiver of tweened values
pub trait TweenTarget<T> {
    fn set_tweened_value(&mut self, value: T);

    /// Whether the underlying object still exists
    fn is_valid(&self) -> bool {
        true
    }
}

impl<T, U: TweenTarget<T> + ?Sized> TweenTarget<T> for Box<U> {
    fn set_tweened_value(&mut self, value: T) {
        (**self).set_tweened_value(value)
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}

// ============================================================================
// Closure target
// ============================================================================

/// Target that forwards every value to a closure
pub struct FnTarget<F>(pub F);

impl<T, F: FnMut(T)> TweenTarget<T> for FnTarget<F> {
    fn set_tweened_value(&mut self, value: T) {
        (self.0)(value)
    }
}

impl<F> fmt::Debug for FnTarget<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTarget")
    }
}

/// Box a closure as a target
pub fn fn_target<T, F>(f: F) -> Box<dyn TweenTarget<T>>
where
    T: 'static,
    F: FnMut(T) + 'static,
{
    Box::new(FnTarget(f))
}

// ============================================================================
// Shared cell target
// ============================================================================

/// Target writing into a shared cell the caller can read back
#[derive(Debug, Default)]
pub struct SharedTarget<T>(Rc<RefCell<T>>);

impl<T> SharedTarget<T> {
    pub fn new(cell: Rc<RefCell<T>>) -> Self {
        Self(cell)
    }

    pub fn cell(&self) -> &Rc<RefCell<T>> {
        &self.0
    }
}

impl<T> Clone for SharedTarget<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> TweenTarget<T> for SharedTarget<T> {
    fn set_tweened_value(&mut self, value: T) {
        if let Ok(mut slot) = self.0.try_borrow_mut() {
            *slot = value;
        }
    }
}

// ============================================================================
// Weak owner target
// ============================================================================

/// Target that writes into an owner it does not keep alive
///
/// Once the owner is dropped the target reports itself invalid and pushes
/// become no-ops.
pub struct WeakTarget<O, T> {
    owner: Weak<RefCell<O>>,
    apply: fn(&mut O, T),
}

impl<O, T> WeakTarget<O, T> {
    pub fn new(owner: &Rc<RefCell<O>>, apply: fn(&mut O, T)) -> Self {
        Self {
            owner: Rc::downgrade(owner),
            apply,
        }
    }
}

impl<O, T> TweenTarget<T> for WeakTarget<O, T> {
    fn set_tweened_value(&mut self, value: T) {
        if let Some(owner) = self.owner.upgrade() {
            if let Ok(mut owner) = owner.try_borrow_mut() {
                (self.apply)(&mut owner, value);
            }
        }
    }

    fn is_valid(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

impl<O, T> fmt::Debug for WeakTarget<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakTarget")
            .field("alive", &(self.owner.strong_count() > 0))
            .finish()
    }
}

// ============================================================================
// Camera target
// ============================================================================

/// Scalar camera property driven by a `CameraTarget`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraProperty {
    #[default]
    OrthographicSize,
    FieldOfView,
}

/// Drives a camera's zoom (`f32`) or background color (`Color`)
#[derive(Clone, Debug)]
pub struct CameraTarget {
    camera: Rc<RefCell<Camera>>,
    property: CameraProperty,
}

impl CameraTarget {
    pub fn new(camera: Rc<RefCell<Camera>>, property: CameraProperty) -> Self {
        Self { camera, property }
    }

    /// Target for the background color
    pub fn background(camera: Rc<RefCell<Camera>>) -> Self {
        Self::new(camera, CameraProperty::default())
    }

    pub fn property(&self) -> CameraProperty {
        self.property
    }
}

impl TweenTarget<f32> for CameraTarget {
    fn set_tweened_value(&mut self, value: f32) {
        let Ok(mut camera) = self.camera.try_borrow_mut() else {
            return;
        };
        match self.property {
            CameraProperty::OrthographicSize => camera.orthographic_size = value,
            CameraProperty::FieldOfView => camera.fov_y = value,
        }
    }
}

impl TweenTarget<Color> for CameraTarget {
    fn set_tweened_value(&mut self, value: Color) {
        if let Ok(mut camera) = self.camera.try_borrow_mut() {
            camera.background = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_target_forwards() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut target = fn_target(move |v: f32| sink.borrow_mut().push(v));
        target.set_tweened_value(1.0);
        target.set_tweened_value(2.0);
        assert_eq!(*seen.borrow(), vec![1.0, 2.0]);
        assert!(target.is_valid());
    }

    #[test]
    fn test_weak_target_invalid_after_drop() {
        let owner = Rc::new(RefCell::new(0.0f32));
        let mut target = WeakTarget::new(&owner, |o: &mut f32, v: f32| *o = v);
        target.set_tweened_value(3.0);
        assert_eq!(*owner.borrow(), 3.0);
        drop(owner);
        assert!(!target.is_valid());
        target.set_tweened_value(4.0);
    }

    #[test]
    fn test_camera_target_honors_property() {
        let camera = Rc::new(RefCell::new(Camera::default()));
        let mut fov = CameraTarget::new(Rc::clone(&camera), CameraProperty::FieldOfView);
        let before = camera.borrow().orthographic_size;
        TweenTarget::<f32>::set_tweened_value(&mut fov, 0.5);
        assert_eq!(camera.borrow().fov_y, 0.5);
        assert_eq!(camera.borrow().orthographic_size, before);

        let mut bg = CameraTarget::background(Rc::clone(&camera));
        bg.set_tweened_value(Color::RED);
        assert_eq!(camera.borrow().background, Color::RED);
    }
}
