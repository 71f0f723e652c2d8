//! Glide Core
//!
//! Plain value types shared by the Glide crates:
//!
//! - **Vectors**: `Vec2`, `Vec3`, `Vec4` with component-wise arithmetic
//! - **Rotation**: `Quat` with composition and shortest-arc slerp
//! - **Color**: linear RGBA `Color` and hue-based `HsvColor`
//! - **Camera**: a minimal camera description that tween targets can drive
//!
//! # Example
//!
//! ```rust
//! use glide_core::{Color, HsvColor, Vec3};
//!
//! let a = Vec3::new(1.0, 0.0, 0.0);
//! let b = Vec3::new(0.0, 1.0, 0.0);
//! assert_eq!(a + b, Vec3::new(1.0, 1.0, 0.0));
//!
//! let hsv = HsvColor::from(Color::RED);
//! assert_eq!(hsv.h, 0.0);
//! ```

pub mod camera;
pub mod color;
pub mod math;

pub use camera::{Camera, Projection};
pub use color::{Color, HsvColor};
pub use math::{Quat, Vec2, Vec3, Vec4};
