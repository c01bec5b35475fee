//! Stroke synthesizer: turns captured pressure samples into a closed,
//! variable-width outline suitable for fill rendering.
//!
//! The centerline is offset on both sides by a per-sample radius. Ink radii
//! follow pressure and taper towards both ends; highlighter radii are a
//! constant wide band. The resulting polygon is smoothed into a continuous
//! curve by using each outline vertex as the control point of a quadratic
//! segment between neighbouring midpoints.

use crate::elements::{Stroke, StrokeKind, StrokeSample};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Samples closer than this are treated as duplicates.
const DUPLICATE_EPSILON: f64 = 1e-9;

/// Tuning for outline synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeOptions {
    /// How strongly pressure changes the radius (0 = ignore pressure).
    pub thinning: f64,
    /// Taper length at the start, in multiples of the stroke width.
    pub taper_start: f64,
    /// Taper length at the end, in multiples of the stroke width.
    pub taper_end: f64,
    /// Smallest radius as a fraction of the nominal radius.
    pub min_radius_ratio: f64,
    /// Segments used for each round cap.
    pub cap_segments: usize,
    /// Quadratic midpoint smoothing. When false the outline is a polygon.
    pub smoothing: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            thinning: 0.6,
            taper_start: 2.0,
            taper_end: 3.0,
            min_radius_ratio: 0.15,
            cap_segments: 6,
            smoothing: true,
        }
    }
}

/// A closed outline polygon in document space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub points: Vec<Point>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Closed path through the outline. With `smooth`, every vertex becomes
    /// the control point of a quadratic between its neighbouring midpoints.
    pub fn to_path(&self, smooth: bool) -> BezPath {
        let pts = &self.points;
        let mut path = BezPath::new();
        if pts.is_empty() {
            return path;
        }

        if !smooth || pts.len() < 3 {
            path.move_to(pts[0]);
            for p in &pts[1..] {
                path.line_to(*p);
            }
            path.close_path();
            return path;
        }

        let n = pts.len();
        path.move_to(pts[0].midpoint(pts[1]));
        for i in 1..=n {
            let control = pts[i % n];
            let next = pts[(i + 1) % n];
            path.quad_to(control, control.midpoint(next));
        }
        path.close_path();
        path
    }
}

/// Drop consecutive samples at the same position.
fn dedup_samples(samples: &[StrokeSample]) -> Vec<StrokeSample> {
    let mut out: Vec<StrokeSample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match out.last() {
            Some(last) if last.point().distance(sample.point()) < DUPLICATE_EPSILON => {}
            _ => out.push(*sample),
        }
    }
    out
}

/// Arc length from the first sample to each sample.
fn cumulative_lengths(samples: &[StrokeSample]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(samples.len());
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            total += samples[i - 1].point().distance(sample.point());
        }
        out.push(total);
    }
    out
}

/// Ease-out ramp from 0 at `d = 0` to 1 at `d = len`.
fn taper_factor(d: f64, len: f64) -> f64 {
    if len <= 0.0 {
        return 1.0;
    }
    let t = (d / len).clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Radius of the outline at every sample.
pub fn sample_radii(samples: &[StrokeSample], width: f64, kind: StrokeKind, options: &StrokeOptions) -> Vec<f64> {
    let nominal = width * kind.width_multiplier() / 2.0;
    if kind == StrokeKind::Highlighter {
        return vec![nominal; samples.len()];
    }

    let lengths = cumulative_lengths(samples);
    let total = lengths.last().copied().unwrap_or(0.0);

    let mut taper_start = options.taper_start * width;
    let mut taper_end = options.taper_end * width;
    // Short strokes share their length between both tapers
    if taper_start + taper_end > total && taper_start + taper_end > 0.0 {
        let scale = total / (taper_start + taper_end);
        taper_start *= scale;
        taper_end *= scale;
    }

    let floor = nominal * options.min_radius_ratio;
    samples
        .iter()
        .zip(&lengths)
        .map(|(sample, &d)| {
            let pressure = 1.0 - options.thinning * (1.0 - 2.0 * sample.pressure);
            let taper = taper_factor(d, taper_start).min(taper_factor(total - d, taper_end));
            (nominal * pressure * taper).max(floor)
        })
        .collect()
}

/// Unit tangent at sample `i`, from its neighbours.
fn tangent_at(points: &[Point], i: usize) -> Vec2 {
    let prev = points[i.saturating_sub(1)];
    let next = points[(i + 1).min(points.len() - 1)];
    let v = next - prev;
    let len = v.hypot();
    if len < DUPLICATE_EPSILON {
        Vec2::new(1.0, 0.0)
    } else {
        v / len
    }
}

/// Half-circle from `+normal` around `forward` to `-normal`, excluding both ends.
fn cap(center: Point, normal: Vec2, forward: Vec2, radius: f64, segments: usize, out: &mut Vec<Point>) {
    for k in 1..segments {
        let theta = std::f64::consts::PI * k as f64 / segments as f64;
        let v = normal * theta.cos() + forward * theta.sin();
        out.push(center + v * radius);
    }
}

/// Compute the fill outline for a captured stroke.
pub fn synthesize(samples: &[StrokeSample], width: f64, kind: StrokeKind, options: &StrokeOptions) -> Outline {
    let samples = dedup_samples(samples);
    let segments = options.cap_segments.max(2);

    match samples.as_slice() {
        [] => Outline::default(),
        [only] => {
            // A dot: full circle
            let radius = sample_radii(&samples, width, kind, options)[0];
            let points = (0..segments * 2)
                .map(|k| {
                    let theta = std::f64::consts::PI * k as f64 / segments as f64;
                    only.point() + Vec2::new(theta.cos(), theta.sin()) * radius
                })
                .collect();
            Outline { points }
        }
        _ => {
            let radii = sample_radii(&samples, width, kind, options);
            let centers: Vec<Point> = samples.iter().map(StrokeSample::point).collect();
            let n = centers.len();

            let mut left = Vec::with_capacity(n);
            let mut right = Vec::with_capacity(n);
            for i in 0..n {
                let t = tangent_at(&centers, i);
                let normal = Vec2::new(-t.y, t.x);
                left.push(centers[i] + normal * radii[i]);
                right.push(centers[i] - normal * radii[i]);
            }

            let mut points = Vec::with_capacity(2 * n + 2 * segments);
            points.extend(&left);

            let end_t = tangent_at(&centers, n - 1);
            cap(centers[n - 1], Vec2::new(-end_t.y, end_t.x), end_t, radii[n - 1], segments, &mut points);

            points.extend(right.iter().rev());

            let start_t = tangent_at(&centers, 0);
            cap(centers[0], Vec2::new(start_t.y, -start_t.x), -start_t, radii[0], segments, &mut points);

            Outline { points }
        }
    }
}

/// Fill path for a committed or in-progress stroke.
pub fn stroke_path(stroke: &Stroke, options: &StrokeOptions) -> BezPath {
    synthesize(&stroke.samples, stroke.width, stroke.kind, options).to_path(options.smoothing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::SerializableColor;
    use kurbo::{PathEl, Shape as KurboShape};

    fn straight(n: usize, pressure: f64) -> Vec<StrokeSample> {
        (0..n)
            .map(|i| StrokeSample::new(i as f64 * 10.0, 0.0, pressure))
            .collect()
    }

    #[test]
    fn test_ink_tapers_at_both_ends() {
        let radii = sample_radii(&straight(11, 0.5), 4.0, StrokeKind::Ink, &StrokeOptions::default());
        let mid = radii[5];
        assert!(radii[0] < mid);
        assert!(radii[10] < mid);
        assert!((mid - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_widens_ink() {
        let options = StrokeOptions::default();
        let light = sample_radii(&straight(11, 0.2), 4.0, StrokeKind::Ink, &options);
        let heavy = sample_radii(&straight(11, 0.9), 4.0, StrokeKind::Ink, &options);
        assert!(heavy[5] > light[5]);
    }

    #[test]
    fn test_highlighter_band_is_constant() {
        let mut samples = straight(5, 0.1);
        samples[2].pressure = 1.0;
        let radii = sample_radii(&samples, 2.0, StrokeKind::Highlighter, &StrokeOptions::default());
        assert!(radii.iter().all(|r| (r - 4.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_radius_never_below_floor() {
        let options = StrokeOptions::default();
        let radii = sample_radii(&straight(3, 0.0), 10.0, StrokeKind::Ink, &options);
        assert!(radii.iter().all(|r| *r >= 5.0 * options.min_radius_ratio - 1e-12));
    }

    #[test]
    fn test_outline_encloses_centerline() {
        let options = StrokeOptions::default();
        let outline = synthesize(&straight(11, 0.5), 6.0, StrokeKind::Ink, &options);
        assert_eq!(outline.points.len(), 2 * 11 + 2 * (options.cap_segments - 1));
        let path = outline.to_path(true);
        assert!(path.contains(Point::new(50.0, 0.0)));
        assert!(!path.contains(Point::new(50.0, 10.0)));
    }

    #[test]
    fn test_smooth_path_uses_quadratics() {
        let outline = synthesize(&straight(5, 0.5), 4.0, StrokeKind::Ink, &StrokeOptions::default());
        let smooth = outline.to_path(true);
        assert!(smooth.elements().iter().any(|el| matches!(el, PathEl::QuadTo(..))));
        let polygon = outline.to_path(false);
        assert!(!polygon.elements().iter().any(|el| matches!(el, PathEl::QuadTo(..))));
        assert!(matches!(polygon.elements().last(), Some(PathEl::ClosePath)));
    }

    #[test]
    fn test_duplicate_samples_collapse_to_dot() {
        let samples = vec![StrokeSample::new(5.0, 5.0, 0.5); 4];
        let outline = synthesize(&samples, 4.0, StrokeKind::Ink, &StrokeOptions::default());
        assert!(!outline.is_empty());
        let bounds = outline.bounds();
        assert!(bounds.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_empty_samples() {
        assert!(synthesize(&[], 4.0, StrokeKind::Ink, &StrokeOptions::default()).is_empty());
    }

    #[test]
    fn test_stroke_path_from_element() {
        let stroke = Stroke::from_samples(straight(4, 0.5), StrokeKind::Highlighter, SerializableColor::black(), 2.0);
        let path = stroke_path(&stroke, &StrokeOptions::default());
        let bounds = path.bounding_box();
        assert!(bounds.height() > 7.0);
    }
}
