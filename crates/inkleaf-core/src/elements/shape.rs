//! Parametric shapes defined by two anchor points.

use super::{ElementId, ElementTrait, SerializableColor, point_to_polyline_dist, point_to_segment_dist};
use kurbo::{BezPath, Circle, Ellipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Angle between the arrow shaft and each arrowhead barb.
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Arrowhead barb length per unit of stroke width.
const ARROW_HEAD_SCALE: f64 = 4.0;

/// Shortest barb, so hairline arrows still show a head.
const ARROW_HEAD_MIN: f64 = 6.0;

/// Flattening tolerance for curve-to-path conversion.
const PATH_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    /// Axis-aligned box spanned by the anchors.
    Rectangle,
    /// Ellipse inscribed in the box spanned by the anchors.
    Ellipse,
    /// Circle centered on the first anchor, passing through the second.
    Circle,
    Line,
    Arrow,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
        }
    }
}

/// An outline shape. Anchors may be given in any corner order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub(crate) id: ElementId,
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub color: SerializableColor,
    pub width: f64,
}

impl Shape {
    pub fn new(kind: ShapeKind, start: Point, end: Point, color: SerializableColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
            color,
            width,
        }
    }

    /// Normalized box spanned by the two anchors.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.end).abs()
    }

    /// Radius of a circle shape (anchor distance).
    pub fn radius(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit vector from start to end.
    pub fn direction(&self) -> Vec2 {
        let v = self.end - self.start;
        let len = v.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            v / len
        }
    }

    /// Characteristic size used for the commit threshold.
    pub fn extent(&self) -> f64 {
        match self.kind {
            ShapeKind::Rectangle | ShapeKind::Ellipse => {
                let rect = self.rect();
                rect.width().max(rect.height())
            }
            ShapeKind::Circle | ShapeKind::Line | ShapeKind::Arrow => self.radius(),
        }
    }

    /// Length of each arrowhead barb.
    pub fn head_length(&self) -> f64 {
        (self.width * ARROW_HEAD_SCALE).max(ARROW_HEAD_MIN)
    }

    /// Tips of the two arrowhead barbs, at ±30° off the reversed shaft.
    pub fn arrow_barbs(&self) -> (Point, Point) {
        let back = -self.direction();
        let len = self.head_length();
        let (sin, cos) = ARROW_HEAD_ANGLE.sin_cos();
        let left = Vec2::new(back.x * cos - back.y * sin, back.x * sin + back.y * cos);
        let right = Vec2::new(back.x * cos + back.y * sin, -back.x * sin + back.y * cos);
        (self.end + left * len, self.end + right * len)
    }

    /// Distance from a point to the drawn outline.
    pub fn outline_distance(&self, point: Point) -> f64 {
        match self.kind {
            ShapeKind::Rectangle => {
                let r = self.rect();
                let corners = [
                    Point::new(r.x0, r.y0),
                    Point::new(r.x1, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                    Point::new(r.x0, r.y0),
                ];
                point_to_polyline_dist(point, &corners)
            }
            ShapeKind::Ellipse => ellipse_ring_distance(self.rect(), point),
            ShapeKind::Circle => (point.distance(self.start) - self.radius()).abs(),
            ShapeKind::Line => point_to_segment_dist(point, self.start, self.end),
            ShapeKind::Arrow => {
                let (left, right) = self.arrow_barbs();
                point_to_segment_dist(point, self.start, self.end)
                    .min(point_to_segment_dist(point, self.end, left))
                    .min(point_to_segment_dist(point, self.end, right))
            }
        }
    }

    /// Path to stroke when rendering (never filled).
    pub fn to_path(&self) -> BezPath {
        match self.kind {
            ShapeKind::Rectangle => self.rect().to_path(PATH_TOLERANCE),
            ShapeKind::Ellipse => Ellipse::from_rect(self.rect()).to_path(PATH_TOLERANCE),
            ShapeKind::Circle => Circle::new(self.start, self.radius()).to_path(PATH_TOLERANCE),
            ShapeKind::Line => {
                let mut path = BezPath::new();
                path.move_to(self.start);
                path.line_to(self.end);
                path
            }
            ShapeKind::Arrow => {
                let mut path = BezPath::new();
                path.move_to(self.start);
                path.line_to(self.end);
                if self.start != self.end {
                    let (left, right) = self.arrow_barbs();
                    path.move_to(self.end);
                    path.line_to(left);
                    path.move_to(self.end);
                    path.line_to(right);
                }
                path
            }
        }
    }
}

/// Approximate distance from a point to the ellipse inscribed in `rect`,
/// measured along the ray from the center. Exact for circles.
fn ellipse_ring_distance(rect: Rect, point: Point) -> f64 {
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    let center = rect.center();

    if rx < f64::EPSILON || ry < f64::EPSILON {
        // Collapsed to a segment
        let (a, b) = if rx < f64::EPSILON {
            (Point::new(center.x, rect.y0), Point::new(center.x, rect.y1))
        } else {
            (Point::new(rect.x0, center.y), Point::new(rect.x1, center.y))
        };
        return point_to_segment_dist(point, a, b);
    }

    let d = point - center;
    let r = d.hypot();
    if r < f64::EPSILON {
        return rx.min(ry);
    }
    let (cos, sin) = (d.x / r, d.y / r);
    let boundary = 1.0 / ((cos / rx).powi(2) + (sin / ry).powi(2)).sqrt();
    (r - boundary).abs()
}

impl ElementTrait for Shape {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let half = self.width / 2.0;
        let raw = match self.kind {
            ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Line => self.rect(),
            ShapeKind::Circle => {
                let r = self.radius();
                Rect::new(self.start.x - r, self.start.y - r, self.start.x + r, self.start.y + r)
            }
            ShapeKind::Arrow => {
                let (left, right) = self.arrow_barbs();
                self.rect().union_pt(left).union_pt(right)
            }
        };
        raw.inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.outline_distance(point) <= tolerance + self.width / 2.0
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
