//! Hit testing and erasing over an immutable element list.
//!
//! Lists are in paint order, so scanning runs back to front: the element
//! the user sees on top is the one that gets picked.

use crate::elements::{Element, ElementId};
use kurbo::{Point, Rect};

/// Index of the topmost element within `tolerance` of `point`.
pub fn topmost_index(point: Point, elements: &[Element], tolerance: f64) -> Option<usize> {
    elements
        .iter()
        .rposition(|element| element.hit_test(point, tolerance))
}

/// The topmost element within `tolerance` of `point`.
pub fn find_topmost(point: Point, elements: &[Element], tolerance: f64) -> Option<&Element> {
    topmost_index(point, elements, tolerance).map(|i| &elements[i])
}

/// Every element hit at `point`, front to back.
pub fn elements_at_point(point: Point, elements: &[Element], tolerance: f64) -> Vec<ElementId> {
    elements
        .iter()
        .rev()
        .filter(|element| element.hit_test(point, tolerance))
        .map(Element::id)
        .collect()
}

/// Elements whose bounds intersect `rect`, in paint order.
pub fn elements_in_rect(rect: Rect, elements: &[Element]) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|element| rect.intersect(element.bounds()).area() > 0.0)
        .map(Element::id)
        .collect()
}

/// New element list without the topmost element at `point`.
///
/// Returns `None` when nothing was hit, so callers can skip recording
/// history for a miss.
pub fn erase_at(point: Point, elements: &[Element], tolerance: f64) -> Option<(Vec<Element>, ElementId)> {
    let index = topmost_index(point, elements, tolerance)?;
    let mut remaining = elements.to_vec();
    let removed = remaining.remove(index);
    Some((remaining, removed.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{SerializableColor, Shape, ShapeKind, Stroke, StrokeKind, StrokeSample, Text};

    fn circle(center: Point, radius: f64) -> Element {
        Shape::new(
            ShapeKind::Circle,
            center,
            Point::new(center.x + radius, center.y),
            SerializableColor::black(),
            0.0,
        )
        .into()
    }

    fn diagonal_stroke() -> Element {
        let samples = (0..5)
            .map(|i| StrokeSample::new(i as f64 * 2.5, i as f64 * 2.5, 0.5))
            .collect();
        Stroke::from_samples(samples, StrokeKind::Ink, SerializableColor::black(), 2.0).into()
    }

    #[test]
    fn test_empty_list() {
        assert!(find_topmost(Point::ZERO, &[], 10.0).is_none());
        assert!(erase_at(Point::ZERO, &[], 10.0).is_none());
    }

    #[test]
    fn test_topmost_wins() {
        let below = diagonal_stroke();
        let above = diagonal_stroke();
        let above_id = above.id();
        let elements = vec![below.clone(), above];

        assert_eq!(find_topmost(Point::new(5.0, 5.0), &elements, 1.0).map(Element::id), Some(above_id));

        let (remaining, removed) = erase_at(Point::new(5.0, 5.0), &elements, 1.0).unwrap();
        assert_eq!(removed, above_id);
        assert_eq!(remaining, vec![below]);
    }

    #[test]
    fn test_ring_semantics() {
        let elements = vec![circle(Point::ZERO, 10.0)];
        assert!(find_topmost(Point::new(0.0, 10.5), &elements, 1.0).is_some());
        assert!(find_topmost(Point::new(0.0, 5.0), &elements, 1.0).is_none());
    }

    #[test]
    fn test_rectangle_interior_misses() {
        let rect: Element = Shape::new(
            ShapeKind::Rectangle,
            Point::new(100.0, 100.0),
            Point::ZERO,
            SerializableColor::black(),
            2.0,
        )
        .into();
        let elements = vec![rect];
        assert!(find_topmost(Point::new(50.0, 50.0), &elements, 3.0).is_none());
        assert!(find_topmost(Point::new(50.0, 97.0), &elements, 3.0).is_some());
    }

    #[test]
    fn test_elements_at_point_front_to_back() {
        let a = diagonal_stroke();
        let b = Element::from(Text::new(Point::new(4.0, 6.0), "note".to_string()));
        let ids = elements_at_point(Point::new(5.0, 5.0), &[a.clone(), b.clone()], 1.0);
        assert_eq!(ids, vec![b.id(), a.id()]);
    }

    #[test]
    fn test_elements_in_rect() {
        let near = diagonal_stroke();
        let far = circle(Point::new(500.0, 500.0), 5.0);
        let ids = elements_in_rect(Rect::new(0.0, 0.0, 20.0, 20.0), &[near.clone(), far]);
        assert_eq!(ids, vec![near.id()]);
    }
}
