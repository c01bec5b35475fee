//! Renderer trait abstraction and the per-variant drawing recipes.

use inkleaf_core::document::Page;
use inkleaf_core::elements::{Element, Image, LINE_HEIGHT_EM, Link, Shape, Stroke, Text};
use inkleaf_core::outline::{self, StrokeOptions};
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Shape as KurboShape, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Drawing surface. Geometry arrives in document space together with the
/// document-to-device transform; widths and font sizes are document units.
pub trait RenderTarget {
    /// Fill a closed path.
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color);

    /// Stroke a path outline.
    fn stroke_path(&mut self, path: &BezPath, transform: Affine, style: &kurbo::Stroke, color: Color);

    /// Draw one line of text with its baseline starting at `baseline`.
    fn draw_text(
        &mut self,
        text: &str,
        baseline: Point,
        font_size: f64,
        transform: Affine,
        color: Color,
        underline: bool,
    );

    /// Draw an image stretched into `rect`.
    fn draw_image(&mut self, source: &str, rect: Rect, transform: Affine);
}

/// Settings that are not part of the element data.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub stroke: StrokeOptions,
    /// Page fill when the page sets none.
    pub page_fill: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stroke: StrokeOptions::default(),
            page_fill: Color::from_rgba8(255, 255, 255, 255),
        }
    }
}

impl RenderOptions {
    pub fn with_stroke(mut self, stroke: StrokeOptions) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_page_fill(mut self, color: Color) -> Self {
        self.page_fill = color;
        self
    }
}

/// Draw `elements` in list order, then `in_progress` on top.
pub fn render(elements: &[Element], in_progress: Option<&Element>, transform: Affine, target: &mut dyn RenderTarget) {
    render_with(&RenderOptions::default(), elements, in_progress, transform, target);
}

/// [`render`] with explicit options.
pub fn render_with(
    options: &RenderOptions,
    elements: &[Element],
    in_progress: Option<&Element>,
    transform: Affine,
    target: &mut dyn RenderTarget,
) {
    for element in elements.iter().chain(in_progress) {
        render_element(options, element, transform, target);
    }
}

/// Draw a whole page: fill, background image, then its elements.
///
/// `extent` is the page size in document units.
pub fn render_page(
    options: &RenderOptions,
    page: &Page,
    extent: Size,
    in_progress: Option<&Element>,
    transform: Affine,
    target: &mut dyn RenderTarget,
) {
    let page_rect = extent.to_rect();
    let fill = page.background.map(Color::from).unwrap_or(options.page_fill);
    target.fill_path(&page_rect.to_path(0.1), transform, fill);
    if let Some(source) = &page.background_image {
        target.draw_image(source, page_rect, transform);
    }
    render_with(options, page.elements(), in_progress, transform, target);
}

/// Draw a single element.
pub fn render_element(options: &RenderOptions, element: &Element, transform: Affine, target: &mut dyn RenderTarget) {
    match element {
        Element::Stroke(stroke) => render_stroke(options, stroke, transform, target),
        Element::Shape(shape) => render_shape(shape, transform, target),
        Element::Text(text) => render_text(text, transform, target),
        Element::Link(link) => render_link(link, transform, target),
        Element::Image(image) => render_image(image, transform, target),
    }
}

fn render_stroke(options: &RenderOptions, stroke: &Stroke, transform: Affine, target: &mut dyn RenderTarget) {
    if stroke.is_empty() {
        return;
    }
    let path = outline::stroke_path(stroke, &options.stroke);
    target.fill_path(&path, transform, stroke.drawn_color().into());
}

fn render_shape(shape: &Shape, transform: Affine, target: &mut dyn RenderTarget) {
    let style = kurbo::Stroke::new(shape.width).with_caps(Cap::Round).with_join(Join::Round);
    target.stroke_path(&shape.to_path(), transform, &style, shape.color.into());
}

/// One call per line, each baseline one line height below the previous.
fn draw_lines(
    content: &str,
    anchor: Point,
    font_size: f64,
    transform: Affine,
    color: Color,
    underline: bool,
    target: &mut dyn RenderTarget,
) {
    for (i, line) in content.lines().enumerate() {
        let baseline = Point::new(anchor.x, anchor.y + i as f64 * font_size * LINE_HEIGHT_EM);
        target.draw_text(line, baseline, font_size, transform, color, underline);
    }
}

fn render_text(text: &Text, transform: Affine, target: &mut dyn RenderTarget) {
    draw_lines(&text.content, text.anchor, text.font_size, transform, text.color.into(), false, target);
}

fn render_link(link: &Link, transform: Affine, target: &mut dyn RenderTarget) {
    draw_lines(link.display_text(), link.anchor, link.font_size, transform, link.color.into(), true, target);
}

fn render_image(image: &Image, transform: Affine, target: &mut dyn RenderTarget) {
    let rect = image.content_rect();
    if rect.is_zero_area() {
        return;
    }
    target.draw_image(&image.source, rect, transform);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::{DisplayList, DrawCommand};
    use inkleaf_core::elements::{SerializableColor, ShapeKind, StrokeKind, StrokeSample};

    fn ink() -> Element {
        let samples = (0..5).map(|i| StrokeSample::new(i as f64 * 2.5, i as f64 * 2.5, 0.5)).collect();
        Stroke::from_samples(samples, StrokeKind::Ink, SerializableColor::new(10, 20, 30, 255), 2.0).into()
    }

    fn rect_shape() -> Element {
        Shape::new(
            ShapeKind::Rectangle,
            Point::new(40.0, 40.0),
            Point::new(10.0, 10.0),
            SerializableColor::black(),
            3.0,
        )
        .into()
    }

    #[test]
    fn test_render_in_list_order_with_preview_last() {
        let mut list = DisplayList::new();
        let preview = Element::from(Text::new(Point::new(0.0, 0.0), "live".to_string()));
        render(&[ink(), rect_shape()], Some(&preview), Affine::IDENTITY, &mut list);

        let commands = list.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::FillPath { .. }));
        assert!(matches!(commands[1], DrawCommand::StrokePath { .. }));
        assert!(matches!(&commands[2], DrawCommand::Text { text, .. } if text == "live"));
    }

    #[test]
    fn test_shapes_are_stroked_with_normalized_rect() {
        let mut list = DisplayList::new();
        render(&[rect_shape()], None, Affine::IDENTITY, &mut list);
        let DrawCommand::StrokePath { path, width, .. } = &list.commands()[0] else {
            panic!("expected stroke");
        };
        assert!((width - 3.0).abs() < f64::EPSILON);
        assert_eq!(path.bounding_box(), Rect::new(10.0, 10.0, 40.0, 40.0));
    }

    #[test]
    fn test_highlighter_fill_is_translucent() {
        let samples = vec![StrokeSample::new(0.0, 0.0, 0.5), StrokeSample::new(30.0, 0.0, 0.5)];
        let color = SerializableColor::new(255, 220, 0, 255);
        let stroke = Stroke::from_samples(samples, StrokeKind::Highlighter, color, 3.0);
        let mut list = DisplayList::new();
        render(&[stroke.into()], None, Affine::IDENTITY, &mut list);
        let DrawCommand::FillPath { color, .. } = &list.commands()[0] else {
            panic!("expected fill");
        };
        assert!(SerializableColor::from(*color).a < 255);
    }

    #[test]
    fn test_empty_stroke_draws_nothing() {
        let stroke = Stroke::new(StrokeKind::Ink, SerializableColor::black(), 2.0);
        let mut list = DisplayList::new();
        render(&[stroke.into()], None, Affine::IDENTITY, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_link_is_underlined() {
        let link = Link::new(Point::new(5.0, 5.0), "https://example.com".to_string(), String::new());
        let mut list = DisplayList::new();
        render(&[link.into()], None, Affine::IDENTITY, &mut list);
        assert!(matches!(
            &list.commands()[0],
            DrawCommand::Text { text, underline: true, .. } if text == "https://example.com"
        ));
    }

    #[test]
    fn test_multiline_text_steps_baselines() {
        let text = Text::new(Point::new(0.0, 20.0), "one\ntwo".to_string());
        let mut list = DisplayList::new();
        render(&[text.into()], None, Affine::IDENTITY, &mut list);
        let DrawCommand::Text { baseline, .. } = &list.commands()[1] else {
            panic!("expected text");
        };
        assert!((baseline.y - (20.0 + 16.0 * LINE_HEIGHT_EM)).abs() < 1e-9);
    }

    #[test]
    fn test_every_drawn_line_is_inside_bounds() {
        let text: Element = Text::new(Point::new(0.0, 20.0), "one\ntwo\nthree".to_string()).into();
        let bounds = text.bounds();
        let mut list = DisplayList::new();
        render(&[text], None, Affine::IDENTITY, &mut list);
        assert_eq!(list.len(), 3);
        for command in list.commands() {
            let DrawCommand::Text { baseline, .. } = command else {
                panic!("expected text");
            };
            assert!(bounds.contains(*baseline));
        }
    }

    #[test]
    fn test_image_is_aspect_fit() {
        let mut image = Image::new(Point::ZERO, 100.0, 100.0, "https://example.com/wide.png".to_string());
        image.natural_size = Some((200, 100));
        let mut list = DisplayList::new();
        render(&[image.into()], None, Affine::IDENTITY, &mut list);
        let DrawCommand::Image { rect, .. } = &list.commands()[0] else {
            panic!("expected image");
        };
        assert_eq!(*rect, Rect::new(0.0, 25.0, 100.0, 75.0));
    }

    #[test]
    fn test_render_page_paints_background_first() {
        let mut page = Page::default();
        page.background_image = Some("raster://1".to_string());
        page.append(ink());

        let mut list = DisplayList::new();
        let transform = Affine::scale(0.5);
        render_page(&RenderOptions::default(), &page, Size::new(100.0, 100.0), None, transform, &mut list);

        let commands = list.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[0], DrawCommand::FillPath { color, .. }
            if SerializableColor::from(*color) == SerializableColor::white()));
        assert!(matches!(&commands[1], DrawCommand::Image { source, .. } if source == "raster://1"));
        assert!(matches!(&commands[2], DrawCommand::FillPath { transform: t, .. } if *t == transform));
    }
}
