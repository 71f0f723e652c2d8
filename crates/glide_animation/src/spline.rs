//! Multi-segment spline paths
//!
//! A spline passes through every control point. Its path is sampled densely
//! once, then re-parameterized by arc length so that progress `0.5` lands
//! halfway along the curve's length rather than halfway through its
//! segments.

use crate::error::{Result, TweenError};
use crate::values::Interpolate;
use glide_core::Vec3;
use std::cell::OnceCell;

/// Default number of samples per segment
pub const DEFAULT_PATH_RESOLUTION: usize = 50;

/// Curve shape between control points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplineKind {
    /// Smooth curve through every point
    #[default]
    CatmullRom,
    /// Straight segments
    Linear,
}

/// One entry of the arc-length table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    /// Normalized distance along the path, `0..=1`
    pub progress: f32,
    pub point: Vec3,
}

/// A path through two or more control points
#[derive(Clone, Debug)]
pub struct Spline {
    points: Vec<Vec3>,
    kind: SplineKind,
    resolution: usize,
    path: OnceCell<Vec<PathSample>>,
    length: OnceCell<f32>,
}

impl Spline {
    /// Catmull-Rom spline with the default resolution
    pub fn new(points: impl Into<Vec<Vec3>>) -> Result<Self> {
        Self::with_resolution(points, DEFAULT_PATH_RESOLUTION)
    }

    pub fn with_resolution(points: impl Into<Vec<Vec3>>, resolution: usize) -> Result<Self> {
        Self::build(points.into(), SplineKind::CatmullRom, resolution)
    }

    /// Straight segments between the points
    pub fn straight(points: impl Into<Vec<Vec3>>) -> Result<Self> {
        Self::build(points.into(), SplineKind::Linear, 1)
    }

    fn build(points: Vec<Vec3>, kind: SplineKind, resolution: usize) -> Result<Self> {
        if points.len() < 2 {
            return Err(TweenError::NotEnoughControlPoints {
                count: points.len(),
            });
        }
        Ok(Self {
            points,
            kind,
            resolution: resolution.max(1),
            path: OnceCell::new(),
            length: OnceCell::new(),
        })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Build and cache the arc-length table. Later calls are free.
    pub fn build_path(&self) -> &[PathSample] {
        self.path.get_or_init(|| {
            let points = self.sample_points();
            let (samples, length) = reparameterize(&points);
            let _ = self.length.set(length);
            samples
        })
    }

    /// Total length of the sampled path
    pub fn length(&self) -> f32 {
        self.build_path();
        self.length.get().copied().unwrap_or_default()
    }

    /// Point at normalized distance `t` along the path
    ///
    /// `t` is clamped; `0` and `1` return the first and last control points.
    pub fn point_on_path(&self, t: f32) -> Vec3 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if t.is_nan() || t <= 0.0 {
            return first;
        }
        if t >= 1.0 {
            return last;
        }

        let samples = self.build_path();
        let i = samples
            .partition_point(|s| s.progress < t)
            .clamp(1, samples.len() - 1);
        let (a, b) = (samples[i - 1], samples[i]);
        let span = b.progress - a.progress;
        if span <= f32::EPSILON {
            return b.point;
        }
        a.point.lerp(&b.point, (t - a.progress) / span)
    }

    fn sample_points(&self) -> Vec<Vec3> {
        let p = &self.points;
        let n = p.len();
        match self.kind {
            SplineKind::Linear => p.clone(),
            SplineKind::CatmullRom => {
                let mut out = Vec::with_capacity((n - 1) * self.resolution + 1);
                for seg in 0..n - 1 {
                    let p0 = if seg == 0 { p[0] * 2.0 - p[1] } else { p[seg - 1] };
                    let p3 = if seg + 2 < n {
                        p[seg + 2]
                    } else {
                        p[n - 1] * 2.0 - p[n - 2]
                    };
                    for i in 0..self.resolution {
                        let t = i as f32 / self.resolution as f32;
                        out.push(catmull_rom(p0, p[seg], p[seg + 1], p3, t));
                    }
                }
                out.push(p[n - 1]);
                out[0] = p[0];
                out
            }
        }
    }
}

/// Uniform Catmull-Rom between `p1` and `p2`
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

/// Cumulative chord length normalized to `0..=1`
fn reparameterize(points: &[Vec3]) -> (Vec<PathSample>, f32) {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0f32;
    cumulative.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        cumulative.push(total);
    }

    let last = points.len().saturating_sub(1).max(1) as f32;
    let mut samples: Vec<PathSample> = points
        .iter()
        .zip(cumulative)
        .enumerate()
        .map(|(i, (&point, distance))| PathSample {
            // Degenerate path: fall back to even spacing by index
            progress: if total > f32::EPSILON {
                distance / total
            } else {
                i as f32 / last
            },
            point,
        })
        .collect();

    if let Some(end) = samples.last_mut() {
        end.progress = 1.0;
    }
    (samples, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner() -> Spline {
        Spline::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_requires_two_points() {
        match Spline::new(vec![Vec3::ZERO]) {
            Err(TweenError::NotEnoughControlPoints { count }) => assert_eq!(count, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Spline::straight(Vec::<Vec3>::new()).is_err());
    }

    #[test]
    fn test_endpoints_exact() {
        let spline = corner();
        assert_eq!(spline.point_on_path(0.0), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(spline.point_on_path(1.0), Vec3::new(10.0, 10.0, 0.0));
        assert_eq!(spline.point_on_path(-2.0), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(spline.point_on_path(7.0), Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_symmetric_midpoint() {
        let spline = corner();
        let mid = spline.point_on_path(0.5);
        assert!(mid.distance(Vec3::new(10.0, 0.0, 0.0)) < 0.25, "mid = {:?}", mid);
    }

    #[test]
    fn test_path_progress_monotonic() {
        let spline = corner();
        let path = spline.build_path();
        assert_eq!(path.len(), 2 * DEFAULT_PATH_RESOLUTION + 1);
        assert!(path.windows(2).all(|w| w[0].progress <= w[1].progress));
        assert_eq!(path[0].progress, 0.0);
        assert_eq!(path[path.len() - 1].progress, 1.0);
        assert!(spline.length() > 20.0);
    }

    #[test]
    fn test_straight_is_arc_length_uniform() {
        let spline = Spline::straight(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ])
        .unwrap();
        let p = spline.point_on_path(0.5);
        assert!((p.x - 2.0).abs() < 1e-5);
        assert!((spline.length() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_path() {
        let spline = Spline::straight(vec![Vec3::ONE, Vec3::ONE]).unwrap();
        assert_eq!(spline.point_on_path(0.5), Vec3::ONE);
        assert_eq!(spline.length(), 0.0);
    }
}
