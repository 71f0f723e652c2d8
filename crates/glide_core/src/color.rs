//! Color types
//!
//! `Color` is linear RGBA. `HsvColor` exists so color tweens can blend
//! through hue instead of straight through RGB space (red → green passes
//! through yellow rather than a muddy brown).

use std::ops::Add;

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Per-channel interpolation. `t` is not clamped.
    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let u = 1.0 - t;
        Color::rgba(
            self.r * u + other.r * t,
            self.g * u + other.g * t,
            self.b * u + other.b * t,
            self.a * u + other.a * t,
        )
    }

    /// Interpolate through HSV space along the shortest hue arc.
    pub fn lerp_hsv(&self, other: &Color, t: f32) -> Color {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }
        HsvColor::from(*self)
            .lerp(&HsvColor::from(*other), t)
            .into()
    }

    pub fn approx_eq(&self, other: &Color, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::rgba(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

/// Hue/saturation/value color with alpha
///
/// Hue is in degrees, `[0, 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HsvColor {
    pub h: f32,
    pub s: f32,
    pub v: f32,
    pub a: f32,
}

impl HsvColor {
    pub const fn new(h: f32, s: f32, v: f32, a: f32) -> Self {
        Self { h, s, v, a }
    }

    /// Interpolate along the shortest hue arc. `t` is not clamped.
    pub fn lerp(&self, other: &HsvColor, t: f32) -> HsvColor {
        // Achromatic endpoints have no meaningful hue; borrow the other one
        let from_h = if self.s <= f32::EPSILON { other.h } else { self.h };
        let to_h = if other.s <= f32::EPSILON { from_h } else { other.h };

        let mut delta = (to_h - from_h) % 360.0;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }

        let u = 1.0 - t;
        HsvColor::new(
            (from_h + delta * t).rem_euclid(360.0),
            self.s * u + other.s * t,
            self.v * u + other.v * t,
            self.a * u + other.a * t,
        )
    }
}

impl From<Color> for HsvColor {
    fn from(c: Color) -> Self {
        let max = c.r.max(c.g).max(c.b);
        let min = c.r.min(c.g).min(c.b);
        let delta = max - min;

        let h = if delta <= f32::EPSILON {
            0.0
        } else if max == c.r {
            60.0 * ((c.g - c.b) / delta).rem_euclid(6.0)
        } else if max == c.g {
            60.0 * ((c.b - c.r) / delta + 2.0)
        } else {
            60.0 * ((c.r - c.g) / delta + 4.0)
        };

        let s = if max <= f32::EPSILON { 0.0 } else { delta / max };

        HsvColor::new(h, s, max, c.a)
    }
}

impl From<HsvColor> for Color {
    fn from(hsv: HsvColor) -> Self {
        let h = hsv.h.rem_euclid(360.0) / 60.0;
        let c = hsv.v * hsv.s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = hsv.v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Color::rgba(r + m, g + m, b + m, hsv.a)
    }
}
