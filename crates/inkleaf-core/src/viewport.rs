//! Coordinate transform between device pixels and document space.
//!
//! Document space is resolution independent: either a fixed logical page
//! size or 0-100 percent of the page on both axes. The page occupies
//! `page_size` device pixels at zoom 1; zoom and pan apply on top.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Units of document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSpace {
    /// Fixed logical page size, e.g. a notebook sheet.
    Logical { width: f64, height: f64 },
    /// Percentage of the page on each axis, for overlays on external images.
    Percent,
}

impl DocumentSpace {
    /// Size of a full page in document units.
    pub fn extent(&self) -> Size {
        match *self {
            DocumentSpace::Logical { width, height } => Size::new(width, height),
            DocumentSpace::Percent => Size::new(100.0, 100.0),
        }
    }

    /// Whole page as a document-space rect.
    pub fn page_rect(&self) -> Rect {
        self.extent().to_rect()
    }
}

/// Zoom and pan state for one host-surface session. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Device-space translation of the page origin.
    pub offset: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Page size in device pixels at zoom 1.
    pub page_size: Size,
    pub space: DocumentSpace,
}

impl Viewport {
    pub fn new(space: DocumentSpace, page_size: Size) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.2,
            max_zoom: 3.0,
            page_size,
            space,
        }
    }

    pub fn from_config(config: &crate::config::EngineConfig, page_size: Size) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            ..Self::new(config.document_space, page_size)
        }
    }

    /// Device pixels per document unit on each axis, at zoom 1.
    fn page_scale(&self) -> Vec2 {
        let extent = self.space.extent();
        let sx = if extent.width > 0.0 { self.page_size.width / extent.width } else { 1.0 };
        let sy = if extent.height > 0.0 { self.page_size.height / extent.height } else { 1.0 };
        Vec2::new(sx, sy)
    }

    /// Transform from document space to device pixels.
    pub fn document_to_device(&self) -> Affine {
        let s = self.page_scale();
        Affine::translate(self.offset) * Affine::scale(self.zoom) * Affine::scale_non_uniform(s.x, s.y)
    }

    /// Transform from device pixels to document space.
    pub fn device_to_document(&self) -> Affine {
        let s = self.page_scale();
        Affine::scale_non_uniform(1.0 / s.x, 1.0 / s.y)
            * Affine::scale(1.0 / self.zoom)
            * Affine::translate(-self.offset)
    }

    pub fn to_document(&self, device_point: Point) -> Point {
        self.device_to_document() * device_point
    }

    pub fn to_device(&self, document_point: Point) -> Point {
        self.document_to_device() * document_point
    }

    /// Device pixels per document unit along x, used for widths and font sizes.
    pub fn width_scale(&self) -> f64 {
        self.zoom * self.page_scale().x
    }

    /// Pan by a delta in device pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the document point under `device_point` fixed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        self.set_zoom_at(device_point, self.zoom * factor);
    }

    /// Set an absolute zoom, keeping the document point under `device_point` fixed.
    pub fn set_zoom_at(&mut self, device_point: Point, zoom: f64) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.to_document(device_point);
        self.zoom = new_zoom;

        // Shift so the anchor lands back under the cursor
        let moved = self.to_device(anchor);
        self.offset += device_point - moved;
    }

    /// Reset to zoom 1 with the page at the origin.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the whole page inside a device viewport, centered, with padding.
    pub fn fit_to_screen(&mut self, viewport: Size, padding: f64) {
        if self.page_size.is_zero_area() {
            self.reset();
            return;
        }

        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / self.page_size.width;
        let scale_y = available.height / self.page_size.height;
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let page = self.page_size * self.zoom;
        self.offset = Vec2::new(
            (viewport.width - page.width) / 2.0,
            (viewport.height - page.height) / 2.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewports() -> Vec<Viewport> {
        let mut notebook = Viewport::new(
            DocumentSpace::Logical {
                width: 1000.0,
                height: 1414.0,
            },
            Size::new(500.0, 707.0),
        );
        notebook.zoom = 1.7;
        notebook.offset = Vec2::new(30.0, -20.0);

        let mut overlay = Viewport::new(DocumentSpace::Percent, Size::new(612.0, 792.0));
        overlay.zoom = 0.35;
        overlay.offset = Vec2::new(-140.5, 88.25);

        vec![
            Viewport::new(DocumentSpace::Percent, Size::new(100.0, 100.0)),
            notebook,
            overlay,
        ]
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_identity_when_page_matches_extent() {
        let viewport = Viewport::new(DocumentSpace::Percent, Size::new(100.0, 100.0));
        assert!(close(viewport.to_document(Point::new(40.0, 60.0)), Point::new(40.0, 60.0)));
    }

    #[test]
    fn test_percent_space_maps_page_corners() {
        let viewport = Viewport::new(DocumentSpace::Percent, Size::new(612.0, 792.0));
        assert!(close(viewport.to_document(Point::new(612.0, 792.0)), Point::new(100.0, 100.0)));
        assert!(close(viewport.to_document(Point::new(306.0, 0.0)), Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_roundtrip_conversion() {
        for viewport in viewports() {
            for p in [Point::new(0.0, 0.0), Point::new(123.0, 456.0), Point::new(-7.5, 1e4)] {
                assert!(close(viewport.to_document(viewport.to_device(p)), p));
                assert!(close(viewport.to_device(viewport.to_document(p)), p));
            }
        }
    }

    #[test]
    fn test_zoom_to_cursor_keeps_point_fixed() {
        for mut viewport in viewports() {
            let cursor = Point::new(210.0, 133.0);
            let before = viewport.to_document(cursor);
            viewport.zoom_at(cursor, 1.37);
            assert!(close(viewport.to_document(cursor), before));
            viewport.zoom_at(cursor, 0.5);
            assert!(close(viewport.to_document(cursor), before));
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new(DocumentSpace::Percent, Size::new(100.0, 100.0));
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom - viewport.min_zoom).abs() < f64::EPSILON);
        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.zoom - viewport.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::new(DocumentSpace::Percent, Size::new(100.0, 100.0));
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!(close(viewport.to_document(Point::new(10.0, 20.0)), Point::ZERO));
    }

    #[test]
    fn test_fit_to_screen_centers_page() {
        let mut viewport = Viewport::new(
            DocumentSpace::Logical {
                width: 1000.0,
                height: 1414.0,
            },
            Size::new(1000.0, 1414.0),
        );
        viewport.fit_to_screen(Size::new(800.0, 600.0), 10.0);
        assert!((viewport.zoom - 580.0 / 1414.0).abs() < 1e-12);
        let center = viewport.to_document(Point::new(400.0, 300.0));
        assert!(close(center, Point::new(500.0, 707.0)));
    }

    #[test]
    fn test_width_scale() {
        let mut viewport = Viewport::new(
            DocumentSpace::Logical {
                width: 1000.0,
                height: 1000.0,
            },
            Size::new(500.0, 500.0),
        );
        viewport.zoom = 2.0;
        assert!((viewport.width_scale() - 1.0).abs() < f64::EPSILON);
    }
}
