//! Animatable value types
//!
//! `Interpolate` is the one capability a value type needs to be tweened:
//! blend between two values, resolve a relative offset, and compare with a
//! tolerance. Implementations exist for scalars, vectors, colors and
//! rotations.

use glide_core::{Color, HsvColor, Quat, Vec2, Vec3, Vec4};

/// Trait for values that can be interpolated by a tween
///
/// `lerp` receives eased progress, which overshooting easings push outside
/// `[0, 1]`, so implementations must not clamp `t`. They must return
/// exactly `self` at `t == 0` and exactly `other` at `t == 1`.
pub trait Interpolate: Clone + Default + 'static {
    /// Blend between `self` and `other` by factor `t`
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Resolve a relative end value: `self` is the start, `by` the offset.
    fn offset(&self, by: &Self) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// Scalars
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }

    fn offset(&self, by: &Self) -> Self {
        self + by
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for i32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        (*self as f32).lerp(&(*other as f32), t).round() as i32
    }

    fn offset(&self, by: &Self) -> Self {
        self.saturating_add(*by)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.abs_diff(*other) as f32) < epsilon.max(1.0)
    }
}

// ============================================================================
// Vectors
// ============================================================================

macro_rules! impl_vector_interpolate {
    ($ty:ident { $($field:ident),+ }) => {
        impl Interpolate for $ty {
            fn lerp(&self, other: &Self, t: f32) -> Self {
                $ty { $($field: self.$field.lerp(&other.$field, t)),+ }
            }

            fn offset(&self, by: &Self) -> Self {
                *self + *by
            }

            fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
                $((self.$field - other.$field).abs() < epsilon)&&+
            }
        }
    };
}

impl_vector_interpolate!(Vec2 { x, y });
impl_vector_interpolate!(Vec3 { x, y, z });
impl_vector_interpolate!(Vec4 { x, y, z, w });

// ============================================================================
// Colors
// ============================================================================

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }

    fn offset(&self, by: &Self) -> Self {
        *self + *by
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        Color::approx_eq(self, other, epsilon)
    }
}

impl Interpolate for HsvColor {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }
        HsvColor::lerp(self, other, t)
    }

    fn offset(&self, by: &Self) -> Self {
        HsvColor::new(
            (self.h + by.h).rem_euclid(360.0),
            self.s + by.s,
            self.v + by.v,
            self.a + by.a,
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let dh = (self.h - other.h).rem_euclid(360.0);
        dh.min(360.0 - dh) < epsilon
            && (self.s - other.s).abs() < epsilon
            && (self.v - other.v).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

// ============================================================================
// Rotations
// ============================================================================

impl Interpolate for Quat {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.slerp(*other, t)
    }

    /// Composition: the offset rotation is applied after the start rotation
    fn offset(&self, by: &Self) -> Self {
        *by * *self
    }

    /// `q` and `-q` are the same rotation and compare equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let sign = if self.dot(*other) < 0.0 { -1.0 } else { 1.0 };
        (self.x - other.x * sign).abs() < epsilon
            && (self.y - other.y * sign).abs() < epsilon
            && (self.z - other.z * sign).abs() < epsilon
            && (self.w - other.w * sign).abs() < epsilon
    }
}
