//! Freehand ink and highlighter strokes.

use super::{ElementId, ElementTrait, SerializableColor};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pressure assumed when the input device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Largest pressure deviation simplification may smooth away.
pub const PRESSURE_TOLERANCE: f64 = 0.1;

/// One captured pointer sample in document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSample {
    pub x: f64,
    pub y: f64,
    /// Normalized pressure in [0, 1].
    pub pressure: f64,
}

impl StrokeSample {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
        }
    }

    /// Build a sample from a point, defaulting missing pressure.
    pub fn at(point: Point, pressure: Option<f64>) -> Self {
        Self::new(point.x, point.y, pressure.unwrap_or(DEFAULT_PRESSURE))
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Ink vs highlighter. Affects opacity and width, not geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeKind {
    #[default]
    Ink,
    Highlighter,
}

impl StrokeKind {
    /// Multiplier applied to the logical width when drawing.
    pub fn width_multiplier(self) -> f64 {
        match self {
            StrokeKind::Ink => 1.0,
            StrokeKind::Highlighter => 4.0,
        }
    }

    /// Opacity applied on top of the stroke color.
    pub fn opacity(self) -> f64 {
        match self {
            StrokeKind::Ink => 1.0,
            StrokeKind::Highlighter => 0.4,
        }
    }
}

/// A freehand stroke (series of pressure samples).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub(crate) id: ElementId,
    /// Samples in capture order.
    pub samples: Vec<StrokeSample>,
    pub color: SerializableColor,
    /// Logical width before the kind multiplier.
    pub width: f64,
    #[serde(default)]
    pub kind: StrokeKind,
}

impl Stroke {
    /// Create an empty stroke.
    pub fn new(kind: StrokeKind, color: SerializableColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            samples: Vec::new(),
            color,
            width,
            kind,
        }
    }

    /// Create from existing samples.
    pub fn from_samples(
        samples: Vec<StrokeSample>,
        kind: StrokeKind,
        color: SerializableColor,
        width: f64,
    ) -> Self {
        Self {
            samples,
            ..Self::new(kind, color, width)
        }
    }

    pub fn add_sample(&mut self, sample: StrokeSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Width as drawn, including the kind multiplier.
    pub fn drawn_width(&self) -> f64 {
        self.width * self.kind.width_multiplier()
    }

    /// Color as drawn, including the kind opacity.
    pub fn drawn_color(&self) -> SerializableColor {
        self.color.with_opacity(self.kind.opacity())
    }

    pub fn points(&self) -> Vec<Point> {
        self.samples.iter().map(StrokeSample::point).collect()
    }

    /// Simplify the centerline. Samples that carry a pressure change survive.
    pub fn simplify(&mut self, tolerance: f64) {
        if self.samples.len() < 3 {
            return;
        }

        // Ramer-Douglas-Peucker algorithm
        self.samples = rdp_simplify(&self.samples, tolerance);
    }
}

/// Ramer-Douglas-Peucker line simplification.
///
/// A sample is kept when it strays from the chord by more than `tolerance`
/// or when its pressure strays from the pressure interpolated along the
/// chord by more than [`PRESSURE_TOLERANCE`].
fn rdp_simplify(samples: &[StrokeSample], tolerance: f64) -> Vec<StrokeSample> {
    if samples.len() < 3 {
        return samples.to_vec();
    }

    let first = samples[0];
    let last = samples[samples.len() - 1];

    let mut max_score = 0.0;
    let mut max_index = 0;

    for (i, sample) in samples.iter().enumerate().skip(1).take(samples.len() - 2) {
        let dist = perpendicular_distance(sample.point(), first.point(), last.point());
        let t = chord_parameter(sample.point(), first.point(), last.point());
        let expected = first.pressure + (last.pressure - first.pressure) * t;
        let pressure_dev = (sample.pressure - expected).abs();

        let score = (dist / tolerance.max(f64::EPSILON)).max(pressure_dev / PRESSURE_TOLERANCE);
        if score > max_score {
            max_score = score;
            max_index = i;
        }
    }

    if max_score > 1.0 {
        let mut left = rdp_simplify(&samples[..=max_index], tolerance);
        let right = rdp_simplify(&samples[max_index..], tolerance);

        // Junction sample appears in both halves
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Position of the projection of `point` along start→end, clamped to [0, 1].
fn chord_parameter(point: Point, line_start: Point, line_end: Point) -> f64 {
    let chord = line_end - line_start;
    let len_sq = chord.hypot2();
    if len_sq < f64::EPSILON {
        return 0.0;
    }
    ((point - line_start).dot(chord) / len_sq).clamp(0.0, 1.0)
}

/// Perpendicular distance from point to the infinite line through start/end.
fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;

    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        return point.distance(line_start);
    }

    // Area of triangle * 2 / base = height
    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}

impl ElementTrait for Stroke {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        if self.samples.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for sample in &self.samples {
            min_x = min_x.min(sample.x);
            min_y = min_y.min(sample.y);
            max_x = max_x.max(sample.x);
            max_y = max_y.max(sample.y);
        }

        let half = self.drawn_width() / 2.0;
        Rect::new(min_x, min_y, max_x, max_y).inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = super::point_to_polyline_dist(point, &self.points());
        dist <= tolerance + self.drawn_width() / 2.0
    }

    fn translate(&mut self, delta: Vec2) {
        for sample in &mut self.samples {
            sample.x += delta.x;
            sample.y += delta.y;
        }
    }
}
