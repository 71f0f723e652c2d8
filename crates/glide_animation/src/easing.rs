//! Easing functions for animations
//!
//! Every easing maps linear progress `t ∈ [0, 1]` to eased progress. The
//! endpoints are always exact (`0 → 0`, `1 → 1`); back and elastic curves
//! overshoot `[0, 1]` in between.

use crate::error::{Result, TweenError};
use crate::values::Interpolate;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    CubicBezier(f32, f32, f32, f32),
}

const BACK: f32 = 1.70158;

impl Easing {
    /// Every named easing, in declaration order
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Whether the curve leaves `[0, 1]` between the endpoints
    pub fn is_overshooting(&self) -> bool {
        match self {
            Easing::BackIn
            | Easing::BackOut
            | Easing::BackInOut
            | Easing::ElasticIn
            | Easing::ElasticOut
            | Easing::ElasticInOut => true,
            Easing::CubicBezier(_, y1, _, y2) => !(0.0..=1.0).contains(y1) || !(0.0..=1.0).contains(y2),
            _ => false,
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match *self {
            Easing::Linear => t,

            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::QuadInOut => in_out(t, 2),

            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => in_out(t, 3),

            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => in_out(t, 4),

            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => 1.0 - (1.0 - t).powi(5),
            Easing::QuintInOut => in_out(t, 5),

            Easing::SineIn => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::SineOut => (t * FRAC_PI_2).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            Easing::ExpoIn => 2f32.powf(10.0 * t - 10.0),
            Easing::ExpoOut => 1.0 - 2f32.powf(-10.0 * t),
            Easing::ExpoInOut => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            Easing::BackIn => (BACK + 1.0) * t * t * t - BACK * t * t,
            Easing::BackOut => 1.0 + (BACK + 1.0) * (t - 1.0).powi(3) + BACK * (t - 1.0).powi(2),
            Easing::BackInOut => {
                let c = BACK * 1.525;
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((c + 1.0) * 2.0 * t - c) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c + 1.0) * (2.0 * t - 2.0) + c) + 2.0) / 2.0
                }
            }

            Easing::ElasticIn => {
                let c = 2.0 * PI / 3.0;
                -2f32.powf(10.0 * t - 10.0) * ((t * 10.0 - 10.75) * c).sin()
            }
            Easing::ElasticOut => {
                let c = 2.0 * PI / 3.0;
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c).sin() + 1.0
            }
            Easing::ElasticInOut => {
                let c = 2.0 * PI / 4.5;
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c).sin()) / 2.0
                } else {
                    2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c).sin() / 2.0 + 1.0
                }
            }

            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }

            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "quad-in",
            Easing::QuadOut => "quad-out",
            Easing::QuadInOut => "quad-in-out",
            Easing::CubicIn => "cubic-in",
            Easing::CubicOut => "cubic-out",
            Easing::CubicInOut => "cubic-in-out",
            Easing::QuartIn => "quart-in",
            Easing::QuartOut => "quart-out",
            Easing::QuartInOut => "quart-in-out",
            Easing::QuintIn => "quint-in",
            Easing::QuintOut => "quint-out",
            Easing::QuintInOut => "quint-in-out",
            Easing::SineIn => "sine-in",
            Easing::SineOut => "sine-out",
            Easing::SineInOut => "sine-in-out",
            Easing::ExpoIn => "expo-in",
            Easing::ExpoOut => "expo-out",
            Easing::ExpoInOut => "expo-in-out",
            Easing::CircIn => "circ-in",
            Easing::CircOut => "circ-out",
            Easing::CircInOut => "circ-in-out",
            Easing::BackIn => "back-in",
            Easing::BackOut => "back-out",
            Easing::BackInOut => "back-in-out",
            Easing::ElasticIn => "elastic-in",
            Easing::ElasticOut => "elastic-out",
            Easing::ElasticInOut => "elastic-in-out",
            Easing::BounceIn => "bounce-in",
            Easing::BounceOut => "bounce-out",
            Easing::BounceInOut => "bounce-in-out",
            Easing::CubicBezier(..) => "cubic-bezier",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Easing {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(args) = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<f32> = args
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| TweenError::UnknownEasing(s.to_string()))?;
            if let [x1, y1, x2, y2] = parts[..] {
                return Ok(Easing::CubicBezier(x1, y1, x2, y2));
            }
            return Err(TweenError::UnknownEasing(s.to_string()));
        }

        Easing::ALL
            .iter()
            .find(|e| e.name() == s)
            .copied()
            .ok_or_else(|| TweenError::UnknownEasing(s.to_string()))
    }
}

/// Symmetric in-out built from the polynomial of the given degree
#[inline]
fn in_out(t: f32, degree: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(degree - 1) * t.powi(degree)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(degree) / 2.0
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Solves `x(p) = t` with Newton-Raphson, bisecting when the slope is too
/// flat, then returns `y(p)`. Computed in f64 to avoid jitter at high frame
/// rates.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let target = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = target;
    let mut solved = false;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - target;
        if err.abs() < 1e-7 {
            solved = true;
            break;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    if !solved {
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        p = target;
        for _ in 0..24 {
            let x = bezier_sample(p, x1, x2);
            if (x - target).abs() < 1e-7 {
                break;
            }
            if x < target {
                lo = p;
            } else {
                hi = p;
            }
            p = (lo + hi) * 0.5;
        }
    }

    bezier_sample(p, y1, y2) as f32
}

/// One axis of a cubic bezier anchored at 0 and 1, in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

// ============================================================================
// Custom curves
// ============================================================================

/// A single `(time, weight)` key of an [`EaseCurve`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// A sampled custom easing curve
///
/// Keys are sorted by time; sampling clamps to the key domain and linearly
/// interpolates between neighbouring keys. Values are free to leave
/// `[0, 1]` or go backwards.
#[derive(Clone, Debug, PartialEq)]
pub struct EaseCurve {
    keys: Vec<CurveKey>,
}

impl EaseCurve {
    pub fn new(keys: impl IntoIterator<Item = (f32, f32)>) -> Result<Self> {
        let mut keys: Vec<CurveKey> = keys
            .into_iter()
            .map(|(time, value)| CurveKey { time, value })
            .collect();
        if keys.is_empty() {
            return Err(TweenError::EmptyCurve);
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keys })
    }

    /// Build a curve by sampling `f` at `samples + 1` evenly spaced times
    /// over `[0, 1]`.
    pub fn from_fn(samples: usize, f: impl Fn(f32) -> f32) -> Self {
        let samples = samples.max(1);
        let keys = (0..=samples)
            .map(|i| {
                let time = i as f32 / samples as f32;
                CurveKey {
                    time,
                    value: f(time),
                }
            })
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Weight of the curve at `t`
    pub fn sample(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; never 0 or len thanks to the clamps above
        let upper = self.keys.partition_point(|k| k.time <= t);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        let local = (t - a.time) / span;
        a.value + (b.value - a.value) * local
    }

    /// Eased progress for `elapsed` out of `duration`
    pub fn progress(&self, elapsed: f32, duration: f32) -> f32 {
        self.sample(normalized_time(elapsed, duration))
    }
}

// ============================================================================
// Evaluation contract
// ============================================================================

/// `clamp(elapsed / duration, 0, 1)`, with a non-positive duration treated
/// as already finished.
#[inline]
pub fn normalized_time(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Eased progress for `elapsed` out of `duration`
#[inline]
pub fn ease_progress(easing: Easing, elapsed: f32, duration: f32) -> f32 {
    easing.apply(normalized_time(elapsed, duration))
}

/// Interpolate `from → to` at `elapsed` out of `duration` with `easing`
pub fn ease<T: Interpolate>(easing: Easing, from: &T, to: &T, elapsed: f32, duration: f32) -> T {
    from.lerp(to, ease_progress(easing, elapsed, duration))
}

/// Interpolate `from → to` using a custom curve for the progress weight
pub fn ease_with_curve<T: Interpolate>(
    curve: &EaseCurve,
    from: &T,
    to: &T,
    elapsed: f32,
    duration: f32,
) -> T {
    from.lerp(to, curve.progress(elapsed, duration))
}
