//! Pointer gesture capture.
//!
//! One gesture at a time: pointer-down starts capturing, moves extend it,
//! pointer-up (or leaving the surface) resolves it to either a committed
//! element or nothing.

use crate::config::EngineConfig;
use crate::elements::{Element, SerializableColor, Shape, ShapeKind, Stroke, StrokeKind, StrokeSample, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    #[default]
    Ink,
    Highlighter,
    Rectangle,
    Ellipse,
    Circle,
    Line,
    Arrow,
    Eraser,
    Pan,
}

impl Tool {
    pub fn stroke_kind(self) -> Option<StrokeKind> {
        match self {
            Tool::Ink => Some(StrokeKind::Ink),
            Tool::Highlighter => Some(StrokeKind::Highlighter),
            _ => None,
        }
    }

    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Ellipse => Some(ShapeKind::Ellipse),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Arrow => Some(ShapeKind::Arrow),
            _ => None,
        }
    }
}

/// Current tool and style, passed explicitly into every capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    pub tool: Tool,
    pub color: SerializableColor,
    /// Logical width in document units.
    pub width: f64,
    pub font_size: f64,
    /// Erase continuously while dragging instead of once per press.
    pub scrub_eraser: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            tool: Tool::Ink,
            color: SerializableColor::black(),
            width: 2.0,
            font_size: Text::DEFAULT_FONT_SIZE,
            scrub_eraser: false,
        }
    }
}

/// Pointer input in device pixels. Touch and pen map onto the same events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// `pressure` is `None` when the device reports none.
    Down { position: Point, pressure: Option<f64> },
    Move { position: Point, pressure: Option<f64> },
    Up { position: Point },
    /// Pointer left the surface. Resolves the gesture like `Up`.
    Leave { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position }
            | PointerEvent::Leave { position } => position,
        }
    }
}

/// Capture state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Capturing {
        tool: Tool,
        start: Point,
        current: Point,
        /// Freehand samples; empty for other tools.
        samples: Vec<StrokeSample>,
    },
}

impl GestureState {
    pub fn is_capturing(&self) -> bool {
        matches!(self, GestureState::Capturing { .. })
    }

    pub fn tool(&self) -> Option<Tool> {
        match self {
            GestureState::Capturing { tool, .. } => Some(*tool),
            GestureState::Idle => None,
        }
    }

    /// Start capturing. Ignored while another gesture is in flight.
    pub fn begin(&mut self, tool: Tool, point: Point, pressure: Option<f64>) -> bool {
        if self.is_capturing() {
            return false;
        }
        let samples = if tool.stroke_kind().is_some() {
            vec![StrokeSample::at(point, pressure)]
        } else {
            Vec::new()
        };
        *self = GestureState::Capturing {
            tool,
            start: point,
            current: point,
            samples,
        };
        true
    }

    /// Extend the gesture. Returns the previous pointer position.
    pub fn update(&mut self, point: Point, pressure: Option<f64>) -> Option<Point> {
        let GestureState::Capturing {
            tool,
            current,
            samples,
            ..
        } = self
        else {
            return None;
        };
        let previous = std::mem::replace(current, point);
        if tool.stroke_kind().is_some() {
            samples.push(StrokeSample::at(point, pressure));
        }
        Some(previous)
    }

    /// End the gesture at `point`, returning the element to commit, if any.
    pub fn finish(&mut self, point: Point, session: &Session, config: &EngineConfig) -> Option<Element> {
        let GestureState::Capturing {
            tool,
            start,
            mut samples,
            ..
        } = std::mem::take(self)
        else {
            return None;
        };

        if let Some(kind) = tool.stroke_kind() {
            let moved = samples.last().is_none_or(|last| last.point() != point);
            if moved {
                let pressure = samples.last().map(|s| s.pressure);
                samples.push(StrokeSample::at(point, pressure));
            }
            if samples.len() < config.min_stroke_samples {
                log::debug!("Discarded {}-sample stroke", samples.len());
                return None;
            }
            let mut stroke = Stroke::from_samples(samples, kind, session.color, session.width);
            if let Some(tolerance) = config.simplify_tolerance {
                stroke.simplify(tolerance);
            }
            return Some(stroke.into());
        }

        let kind = tool.shape_kind()?;
        let shape = Shape::new(kind, start, point, session.color, session.width);
        if shape.extent() < config.min_shape_size {
            log::debug!("Discarded {} below {} units", kind.name(), config.min_shape_size);
            return None;
        }
        Some(shape.into())
    }

    /// Abandon the gesture without committing anything.
    pub fn cancel(&mut self) {
        *self = GestureState::Idle;
    }

    /// The element being drawn, with its live geometry.
    pub fn preview(&self, session: &Session) -> Option<Element> {
        let GestureState::Capturing {
            tool,
            start,
            current,
            samples,
        } = self
        else {
            return None;
        };
        if let Some(kind) = tool.stroke_kind() {
            return Some(Stroke::from_samples(samples.clone(), kind, session.color, session.width).into());
        }
        let kind = tool.shape_kind()?;
        Some(Shape::new(kind, *start, *current, session.color, session.width).into())
    }
}
