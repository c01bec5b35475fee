//! Editing session over one document.
//!
//! Wires pointer events through the viewport into gesture capture, then
//! commits results to the current page. Rendering and persistence stay
//! with the host: it reads [`Editor::in_progress`] for the live element and
//! drains [`Editor::drain_events`] to schedule saves.

use crate::config::EngineConfig;
use crate::document::{Document, DocumentEvent, PageId};
use crate::elements::{Element, ElementId, Image, ImageDataError, Link, Text};
use crate::gesture::{GestureState, PointerEvent, Session, Tool};
use crate::import::{ImportReport, RasterPage};
use crate::viewport::Viewport;
use kurbo::{Point, Size};

#[derive(Debug)]
pub struct Editor {
    document: Document,
    pub viewport: Viewport,
    pub session: Session,
    gesture: GestureState,
    config: EngineConfig,
}

impl Editor {
    /// Start editing a fresh document.
    pub fn new(name: impl Into<String>, config: EngineConfig, page_size: Size) -> Self {
        let document = Document::with_history_depth(name, config.history_depth);
        Self::with_document(document, config, page_size)
    }

    /// Edit an existing document. Its page histories take the configured depth.
    pub fn with_document(mut document: Document, config: EngineConfig, page_size: Size) -> Self {
        if document.history_depth() != config.history_depth {
            document.set_history_depth(config.history_depth);
        }
        Self {
            document,
            viewport: Viewport::from_config(&config, page_size),
            session: Session::default(),
            gesture: GestureState::Idle,
            config,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Switch tools. Any gesture in flight is dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        self.gesture.cancel();
        self.session.tool = tool;
    }

    /// Feed one pointer event. Returns true when the host should redraw.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let device = event.position();
        let point = self.viewport.to_document(device);

        match event {
            PointerEvent::Down { pressure, .. } => {
                let tool = self.session.tool;
                // Pan tracks device pixels since the mapping moves under it
                let anchor = if tool == Tool::Pan { device } else { point };
                if !self.gesture.begin(tool, anchor, pressure) {
                    return false;
                }
                match tool {
                    Tool::Eraser => self.erase(point),
                    Tool::Pan => false,
                    _ => true,
                }
            }
            PointerEvent::Move { pressure, .. } => match self.gesture.tool() {
                None => false,
                Some(Tool::Pan) => match self.gesture.update(device, None) {
                    Some(previous) => {
                        self.viewport.pan(device - previous);
                        true
                    }
                    None => false,
                },
                Some(Tool::Eraser) => {
                    self.gesture.update(point, None);
                    self.session.scrub_eraser && self.erase(point)
                }
                Some(_) => self.gesture.update(point, pressure).is_some(),
            },
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } => {
                if !self.gesture.is_capturing() {
                    return false;
                }
                if let Some(element) = self.gesture.finish(point, &self.session, &self.config) {
                    self.document.append_element(element);
                }
                true
            }
        }
    }

    fn erase(&mut self, point: Point) -> bool {
        self.document.erase_at(point, self.config.hit_tolerance).is_some()
    }

    /// The element currently being drawn.
    pub fn in_progress(&self) -> Option<Element> {
        self.gesture.preview(&self.session)
    }

    /// Drop the gesture in flight without committing it.
    pub fn cancel_gesture(&mut self) {
        self.gesture.cancel();
    }

    /// Place a text label at a document-space baseline point.
    pub fn insert_text(&mut self, anchor: Point, content: &str) -> Option<ElementId> {
        if content.trim().is_empty() {
            return None;
        }
        let text = Text::new(anchor, content.to_string()).with_style(self.session.color, self.session.font_size);
        Some(self.document.append_element(text.into()))
    }

    /// Place a link at a document-space baseline point.
    pub fn insert_link(&mut self, anchor: Point, url: &str, label: &str) -> Option<ElementId> {
        if url.trim().is_empty() {
            return None;
        }
        let mut link = Link::new(anchor, url.to_string(), label.to_string());
        link.font_size = self.session.font_size;
        Some(self.document.append_element(link.into()))
    }

    /// Embed raw image bytes into a document-space box.
    pub fn insert_image(&mut self, anchor: Point, size: Size, data: &[u8]) -> Result<ElementId, ImageDataError> {
        let image = Image::from_bytes(anchor, size.width, size.height, data)?;
        Ok(self.document.append_element(image.into()))
    }

    /// Reference an externally hosted image.
    pub fn insert_image_url(&mut self, anchor: Point, size: Size, url: &str) -> ElementId {
        let image = Image::new(anchor, size.width, size.height, url.to_string());
        self.document.append_element(image.into())
    }

    pub fn undo(&mut self) -> bool {
        self.document.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }

    /// Zoom around a device point.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        self.viewport.zoom_at(device_point, factor);
    }

    pub fn fit_to_screen(&mut self, viewport_size: Size, padding: f64) {
        self.viewport.fit_to_screen(viewport_size, padding);
    }

    /// Switch pages. Any gesture in flight is dropped.
    pub fn set_current_page(&mut self, index: usize) -> bool {
        self.gesture.cancel();
        self.document.set_current_page(index)
    }

    /// Append a blank page and make it current. Any gesture in flight is dropped.
    pub fn add_page(&mut self) -> PageId {
        self.gesture.cancel();
        self.document.add_page()
    }

    pub fn delete_page(&mut self, index: usize) -> bool {
        self.gesture.cancel();
        self.document.delete_page(index)
    }

    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        self.gesture.cancel();
        self.document.move_page(from, to)
    }

    /// Append rasterized pages from an imported file.
    pub fn import_pages(&mut self, file_name: &str, rasters: Vec<RasterPage>) -> ImportReport {
        self.gesture.cancel();
        self.document.import_pages(file_name, rasters)
    }

    pub fn drain_events(&mut self) -> Vec<DocumentEvent> {
        self.document.drain_events()
    }
}
