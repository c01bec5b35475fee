//! Static SVG export.

use crate::renderer::{RenderResult, RenderTarget};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use std::fmt::Write as _;
use std::io::Write;

/// Builds a standalone SVG document from draw calls.
///
/// Transforms are emitted as `matrix(...)` attributes so widths and font
/// sizes stay in document units and scale with the view.
#[derive(Debug, Clone)]
pub struct SvgTarget {
    size: Size,
    body: String,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// `fill="rgb(..)" fill-opacity=".."` style pair.
fn paint(attr: &str, color: Color) -> String {
    let rgba = color.to_rgba8();
    let mut out = format!(r#"{attr}="rgb({},{},{})""#, rgba.r, rgba.g, rgba.b);
    if rgba.a < 255 {
        let _ = write!(out, r#" {attr}-opacity="{:.3}""#, rgba.a as f64 / 255.0);
    }
    out
}

fn matrix(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!(r#"transform="matrix({a} {b} {c} {d} {e} {f})""#)
}

impl SvgTarget {
    /// Target with a device-space canvas of `size` pixels.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    /// The finished SVG document.
    pub fn finish(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
{body}</svg>
"#,
            w = self.size.width,
            h = self.size.height,
            body = self.body
        )
    }

    pub fn write_to(&self, mut writer: impl Write) -> RenderResult<()> {
        writer.write_all(self.finish().as_bytes())?;
        Ok(())
    }
}

impl RenderTarget for SvgTarget {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" {} {}/>"#,
            path.to_svg(),
            paint("fill", color),
            matrix(transform)
        );
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, style: &kurbo::Stroke, color: Color) {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="none" {} stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" {}/>"#,
            path.to_svg(),
            paint("stroke", color),
            style.width,
            matrix(transform)
        );
    }

    fn draw_text(
        &mut self,
        text: &str,
        baseline: Point,
        font_size: f64,
        transform: Affine,
        color: Color,
        underline: bool,
    ) {
        let decoration = if underline { r#" text-decoration="underline""# } else { "" };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-size="{}" font-family="sans-serif" {}{} {}>{}</text>"#,
            baseline.x,
            baseline.y,
            font_size,
            paint("fill", color),
            decoration,
            matrix(transform),
            escape(text)
        );
    }

    fn draw_image(&mut self, source: &str, rect: Rect, transform: Affine) {
        let _ = writeln!(
            self.body,
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" {}/>"#,
            escape(source),
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            matrix(transform)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RendererError, render};
    use inkleaf_core::elements::{Element, Link, SerializableColor, Shape, ShapeKind};

    #[test]
    fn test_empty_document() {
        let svg = SvgTarget::new(Size::new(200.0, 100.0)).finish();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_shape_becomes_stroked_path() {
        let line: Element = Shape::new(
            ShapeKind::Line,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            SerializableColor::new(255, 0, 0, 128),
            2.0,
        )
        .into();
        let mut target = SvgTarget::new(Size::new(100.0, 100.0));
        render(&[line], None, Affine::scale(2.0), &mut target);
        let svg = target.finish();
        assert!(svg.contains(r#"d="M0,0"#));
        assert!(svg.contains("L10,0"));
        assert!(svg.contains(r#"fill="none" stroke="rgb(255,0,0)" stroke-opacity="0.502""#));
        assert!(svg.contains(r#"transform="matrix(2 0 0 2 0 0)""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let link = Link::new(Point::new(1.0, 2.0), "https://a.test/?q=1&r=<2>".to_string(), String::new());
        let mut target = SvgTarget::new(Size::new(100.0, 100.0));
        render(&[link.into()], None, Affine::IDENTITY, &mut target);
        let svg = target.finish();
        assert!(svg.contains("https://a.test/?q=1&amp;r=&lt;2&gt;"));
        assert!(svg.contains(r#"text-decoration="underline""#));
    }

    #[test]
    fn test_write_to_buffer() {
        let target = SvgTarget::new(Size::new(10.0, 10.0));
        let mut out = Vec::new();
        target.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), target.finish());
    }

    #[test]
    fn test_write_error_is_io() {
        let target = SvgTarget::new(Size::new(10.0, 10.0));
        let mut out = [0u8; 8];
        let err = target.write_to(&mut out[..]).unwrap_err();
        assert!(matches!(err, RendererError::Io(_)));
    }
}
