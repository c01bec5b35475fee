//! Hyperlink labels. Activation belongs to the host; the engine only
//! renders and hit-tests them.

use super::{ElementId, ElementTrait, SerializableColor, label_bounds};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub(crate) id: ElementId,
    /// Baseline origin of the label.
    pub anchor: Point,
    pub url: String,
    /// Display label. Empty means the URL itself is shown.
    #[serde(default)]
    pub label: String,
    pub color: SerializableColor,
    pub font_size: f64,
}

impl Link {
    pub fn new(anchor: Point, url: String, label: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            url,
            label,
            color: SerializableColor::new(37, 99, 235, 255),
            font_size: super::Text::DEFAULT_FONT_SIZE,
        }
    }

    /// Text that is actually drawn.
    pub fn display_text(&self) -> &str {
        if self.label.is_empty() { &self.url } else { &self.label }
    }
}

impl ElementTrait for Link {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        label_bounds(self.anchor, self.display_text(), self.font_size)
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
    fn test_display_text_falls_back_to_url() {
        let link = Link::new(Point::ZERO, "https://example.com".to_string(), String::new());
        assert_eq!(link.display_text(), "https://example.com");
        let labelled = Link::new(Point::ZERO, "https://example.com".to_string(), "docs".to_string());
        assert_eq!(labelled.display_text(), "docs");
    }

    #[test]
    fn test_second_label_line_is_hittable() {
        let link = Link::new(Point::new(0.0, 20.0), "https://example.com".to_string(), "see\nalso".to_string());
        assert!(link.hit_test(Point::new(10.0, 35.0), 0.0));
    }

    #[test]
    fn test_label_width_drives_bounds() {
        let short = Link::new(Point::ZERO, "https://example.com".to_string(), "a".to_string());
        let long = Link::new(Point::ZERO, "https://example.com".to_string(), String::new());
        assert!(long.bounds().width() > short.bounds().width());
    }
}
