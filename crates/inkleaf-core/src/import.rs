//! Boundary with the external rasterization pipeline.
//!
//! The engine never parses source documents. It receives one already
//! rasterized image per source page, tagged with its 1-based page number,
//! and turns each into a page background.

use crate::document::PageId;
use crate::elements::{EncodedImage, ImageDataError};
use thiserror::Error;

/// Import failures. Reported once per import, never per page.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to decode page {page_number}: {source}")]
    Decode {
        page_number: u32,
        #[source]
        source: ImageDataError,
    },
    #[error("Imported {imported} of {total} pages from {file_name}; failed pages: {failed:?}")]
    PartialImport {
        file_name: String,
        imported: usize,
        total: usize,
        failed: Vec<u32>,
    },
}

/// A rasterized page ready to become a page background.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    /// URL or `data:` URL of the raster.
    pub url: String,
}

impl BackgroundImage {
    /// Reference an image the host already serves.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Embed raw PNG/JPEG/WebP bytes. The page background is stretched to
    /// the page extent, so pixel dimensions are only used for validation.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageDataError> {
        Ok(Self {
            url: EncodedImage::from_bytes(data)?.url,
        })
    }
}

/// Outcome of rasterizing one source page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// 1-based page number in the source document.
    pub page_number: u32,
    /// The raster, or the pipeline's reason for failing.
    pub image: Result<BackgroundImage, String>,
}

impl RasterPage {
    pub fn ok(page_number: u32, image: BackgroundImage) -> Self {
        Self {
            page_number,
            image: Ok(image),
        }
    }

    pub fn failed(page_number: u32, reason: impl Into<String>) -> Self {
        Self {
            page_number,
            image: Err(reason.into()),
        }
    }

    /// Wrap raw bytes, turning a decode failure into a failed page.
    pub fn from_bytes(page_number: u32, data: &[u8]) -> Self {
        let image = BackgroundImage::from_bytes(data).map_err(|source| {
            ImportError::Decode {
                page_number,
                source,
            }
            .to_string()
        });
        Self { page_number, image }
    }
}

/// What an import added.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// New pages, in source order.
    pub added: Vec<PageId>,
    /// The page that became current, if any were added.
    pub first_added: Option<PageId>,
    /// Source page numbers that could not be imported.
    pub failed_pages: Vec<u32>,
    /// Single summary of every failure.
    pub error: Option<ImportError>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}
