//! Text labels.

use super::{ElementId, ElementTrait, SerializableColor};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Average advance per character, in ems. The engine does no font layout.
const CHAR_WIDTH_EM: f64 = 0.6;

/// Descent below the baseline, in ems.
const DESCENT_EM: f64 = 0.25;

/// Distance between consecutive baselines, in ems.
pub const LINE_HEIGHT_EM: f64 = 1.2;

/// Estimated box of a label whose first baseline starts at `anchor`.
/// Each further line sits one line height lower.
pub fn label_bounds(anchor: Point, label: &str, font_size: f64) -> Rect {
    let (lines, longest) = label
        .lines()
        .fold((0usize, 0usize), |(n, longest), line| (n + 1, longest.max(line.chars().count())));
    let width = longest.max(1) as f64 * font_size * CHAR_WIDTH_EM;
    let extra_lines = lines.saturating_sub(1) as f64;
    Rect::new(
        anchor.x,
        anchor.y - font_size,
        anchor.x + width,
        anchor.y + extra_lines * font_size * LINE_HEIGHT_EM + font_size * DESCENT_EM,
    )
}

/// A text label anchored at its baseline origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ElementId,
    /// Baseline origin.
    pub anchor: Point,
    pub content: String,
    pub color: SerializableColor,
    pub font_size: f64,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    pub fn new(anchor: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            content,
            color: SerializableColor::black(),
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_style(mut self, color: SerializableColor, font_size: f64) -> Self {
        self.color = color;
        self.font_size = font_size;
        self
    }
}

impl ElementTrait for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        label_bounds(self.anchor, &self.content, self.font_size)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_sit_on_baseline() {
        let text = Text::new(Point::new(10.0, 100.0), "abcd".to_string()).with_style(SerializableColor::black(), 20.0);
        let bounds = text.bounds();
        assert!((bounds.y0 - 80.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 105.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 48.0).abs() < 1e-10);
    }

    #[test]
    fn test_hit_test_box() {
        let text = Text::new(Point::new(0.0, 20.0), "hello".to_string());
        assert!(text.hit_test(Point::new(10.0, 10.0), 0.0));
        assert!(!text.hit_test(Point::new(10.0, 40.0), 0.0));
        assert!(text.hit_test(Point::new(-2.0, 10.0), 3.0));
    }

    #[test]
    fn test_multiline_bounds_cover_every_line() {
        let text = Text::new(Point::new(0.0, 20.0), "one\nlonger".to_string());
        let bounds = text.bounds();
        let second_baseline = 20.0 + 16.0 * LINE_HEIGHT_EM;
        assert!((bounds.y1 - (second_baseline + 16.0 * DESCENT_EM)).abs() < 1e-9);
        assert!((bounds.width() - 6.0 * 16.0 * CHAR_WIDTH_EM).abs() < 1e-9);
        assert!(text.hit_test(Point::new(10.0, 35.0), 0.0));
        assert!(!text.hit_test(Point::new(10.0, 50.0), 0.0));
    }

    #[test]
    fn test_empty_text_still_has_area() {
        let text = Text::new(Point::ZERO, String::new());
        assert!(text.bounds().area() > 0.0);
    }
}
