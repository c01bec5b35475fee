//! Drawable elements placed on a page.
//!
//! Every element lives in document space. Insertion order in a page's
//! element list is paint order, back to front.

mod image;
mod link;
mod shape;
mod stroke;
mod text;

pub use self::image::{EncodedImage, Image, ImageDataError, ImageFormat, aspect_fit, decode_data_url};
pub use link::Link;
pub use shape::{ARROW_HEAD_ANGLE, Shape, ShapeKind};
pub use stroke::{Stroke, StrokeKind, StrokeSample};
pub use text::{LINE_HEIGHT_EM, Text, label_bounds};

#[cfg(test)]
pub(crate) use self::image::tests::png_bytes;

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Same color with its alpha scaled by `opacity` (0.0 - 1.0).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for elements. Stable across undo/redo and storage.
pub type ElementId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point.distance(proj)
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Behavior shared by every element variant.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Bounding box in document space.
    fn bounds(&self) -> Rect;

    /// Check if a document-space point hits the drawn geometry.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Move the element by a document-space delta.
    fn translate(&mut self, delta: Vec2);
}

/// Closed set of drawable element variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Stroke(Stroke),
    Shape(Shape),
    Text(Text),
    Link(Link),
    Image(Image),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Stroke(e) => e.id(),
            Element::Shape(e) => e.id(),
            Element::Text(e) => e.id(),
            Element::Link(e) => e.id(),
            Element::Image(e) => e.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Stroke(e) => e.bounds(),
            Element::Shape(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
            Element::Link(e) => e.bounds(),
            Element::Image(e) => e.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Stroke(e) => e.hit_test(point, tolerance),
            Element::Shape(e) => e.hit_test(point, tolerance),
            Element::Text(e) => e.hit_test(point, tolerance),
            Element::Link(e) => e.hit_test(point, tolerance),
            Element::Image(e) => e.hit_test(point, tolerance),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Stroke(e) => e.translate(delta),
            Element::Shape(e) => e.translate(delta),
            Element::Text(e) => e.translate(delta),
            Element::Link(e) => e.translate(delta),
            Element::Image(e) => e.translate(delta),
        }
    }

    /// Short variant name, used in log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Stroke(s) => match s.kind {
                StrokeKind::Ink => "ink",
                StrokeKind::Highlighter => "highlighter",
            },
            Element::Shape(s) => s.kind.name(),
            Element::Text(_) => "text",
            Element::Link(_) => "link",
            Element::Image(_) => "image",
        }
    }

    /// Get the link if this element is a link.
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Element::Link(link) => Some(link),
            _ => None,
        }
    }
}

impl From<Stroke> for Element {
    fn from(stroke: Stroke) -> Self {
        Element::Stroke(stroke)
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Element::Shape(shape)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}

impl From<Link> for Element {
    fn from(link: Link) -> Self {
        Element::Link(link)
    }
}

impl From<Image> for Element {
    fn from(image: Image) -> Self {
        Element::Image(image)
    }
}
