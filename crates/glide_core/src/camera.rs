//! Camera description

use crate::color::Color;
use crate::math::Vec3;

/// Camera projection type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera for 3D scenes
///
/// Both the perspective field of view and the orthographic size are kept so
/// either can be animated regardless of the active projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Half the vertical extent of the orthographic view volume
    pub orthographic_size: f32,
    pub near: f32,
    pub far: f32,
    pub background: Color,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::UP,
            projection: Projection::Perspective,
            fov_y: std::f32::consts::FRAC_PI_4,
            orthographic_size: 5.0,
            near: 0.1,
            far: 1000.0,
            background: Color::BLACK,
        }
    }
}

impl Camera {
    pub fn perspective(position: Vec3, target: Vec3, fov_y: f32) -> Self {
        Self {
            position,
            target,
            fov_y,
            ..Default::default()
        }
    }

    pub fn orthographic(position: Vec3, target: Vec3, size: f32) -> Self {
        Self {
            position,
            target,
            projection: Projection::Orthographic,
            orthographic_size: size,
            ..Default::default()
        }
    }
}
