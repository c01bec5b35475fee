//! Embedded raster images.

use super::{ElementId, ElementTrait};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;
use uuid::Uuid;

/// Errors turning raw bytes into an image reference.
#[derive(Debug, Error)]
pub enum ImageDataError {
    #[error("Unrecognized image format")]
    UnknownFormat,
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Not a base64 data URL")]
    NotDataUrl,
}

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Encoded bytes plus their pixel dimensions, ready to reference from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    /// `data:<mime>;base64,...` URL.
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// Read dimensions from raw PNG/JPEG/WebP bytes and wrap them as a data URL.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageDataError> {
        let format = ImageFormat::from_magic_bytes(data).ok_or(ImageDataError::UnknownFormat)?;
        let (width, height) = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageDataError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ImageDataError::Decode(e.to_string()))?;
        Ok(Self {
            url: format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data)),
            width,
            height,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ImageDataError> {
    let payload = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or(ImageDataError::NotDataUrl)?;
    STANDARD
        .decode(payload)
        .map_err(|e| ImageDataError::Decode(e.to_string()))
}

/// Largest rect with the natural aspect ratio that fits `frame`, centered in it.
pub fn aspect_fit(natural: Size, frame: Rect) -> Rect {
    if natural.width <= 0.0 || natural.height <= 0.0 || frame.is_zero_area() {
        return frame;
    }
    let scale = (frame.width() / natural.width).min(frame.height() / natural.height);
    let fitted = Size::new(natural.width * scale, natural.height * scale);
    let center = frame.center();
    Rect::from_center_size(center, fitted)
}

/// An image drawn into a document-space box, aspect-fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub(crate) id: ElementId,
    /// Top-left corner of the box.
    pub anchor: Point,
    pub width: f64,
    pub height: f64,
    /// URL or `data:` URL of the image.
    pub source: String,
    /// Pixel dimensions, when known. Without them the image fills its box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_size: Option<(u32, u32)>,
}

impl Image {
    pub fn new(anchor: Point, width: f64, height: f64, source: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            width,
            height,
            source,
            natural_size: None,
        }
    }

    /// Embed raw image bytes, remembering their pixel size.
    pub fn from_bytes(anchor: Point, width: f64, height: f64, data: &[u8]) -> Result<Self, ImageDataError> {
        let encoded = EncodedImage::from_bytes(data)?;
        Ok(Self {
            natural_size: Some((encoded.width, encoded.height)),
            ..Self::new(anchor, width, height, encoded.url)
        })
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.anchor.x,
            self.anchor.y,
            self.anchor.x + self.width,
            self.anchor.y + self.height,
        )
        .abs()
    }

    /// Where the pixels land inside the box.
    pub fn content_rect(&self) -> Rect {
        match self.natural_size {
            Some((w, h)) => aspect_fit(Size::new(w as f64, h as f64), self.as_rect()),
            None => self.as_rect(),
        }
    }
}

impl ElementTrait for Image {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a solid-color PNG of the given size.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
    }

    #[test]
    fn test_from_bytes_reads_dimensions() {
        let img = Image::from_bytes(Point::ZERO, 100.0, 100.0, &png_bytes(4, 2)).unwrap();
        assert_eq!(img.natural_size, Some((4, 2)));
        assert!(img.source.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&img.source).unwrap(), png_bytes(4, 2));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = Image::from_bytes(Point::ZERO, 1.0, 1.0, b"not an image");
        assert!(matches!(result, Err(ImageDataError::UnknownFormat)));
    }

    #[test]
    fn test_aspect_fit_wide_image() {
        let fitted = aspect_fit(Size::new(1000.0, 500.0), Rect::new(0.0, 0.0, 400.0, 400.0));
        assert!((fitted.width() - 400.0).abs() < 1e-9);
        assert!((fitted.height() - 200.0).abs() < 1e-9);
        assert!((fitted.y0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_rect_without_natural_size_fills_box() {
        let img = Image::new(Point::new(10.0, 20.0), 100.0, 50.0, "https://example.com/a.png".to_string());
        assert_eq!(img.content_rect(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }
}
