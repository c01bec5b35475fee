//! Pages and the document that owns them.
//!
//! Each page keeps its element list plus its own bounded history. The
//! document owns the page order and the current selection, and queues a
//! [`DocumentEvent`] for every change so the host can persist and redraw.

use crate::config::DEFAULT_HISTORY_DEPTH;
use crate::elements::{Element, ElementId, SerializableColor};
use crate::hit;
use crate::history::History;
use crate::import::{ImportError, ImportReport, RasterPage};
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PageId = Uuid;

/// Where an imported page came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceImportTag {
    pub file_name: String,
    /// 1-based page number in the source document.
    pub page_number: u32,
}

/// One page: an ordered element list over an optional background.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    /// Paint order, back to front.
    elements: Vec<Element>,
    #[serde(default)]
    pub background: Option<SerializableColor>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub source_import_tag: Option<SourceImportTag>,
    #[serde(skip)]
    history: History<Vec<Element>>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl Page {
    /// Blank page with empty history.
    pub fn new(history_depth: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            elements: Vec::new(),
            background: None,
            background_image: None,
            source_import_tag: None,
            history: History::new(history_depth),
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn history(&self) -> &History<Vec<Element>> {
        &self.history
    }

    /// Replace the element list, recording the old one for undo.
    pub fn commit(&mut self, elements: Vec<Element>) {
        self.history.commit(&mut self.elements, elements);
    }

    /// Add an element on top of everything else.
    pub fn append(&mut self, element: Element) {
        let mut next = self.elements.clone();
        next.push(element);
        self.commit(next);
    }

    /// Remove the topmost element at `point`. A miss records nothing.
    pub fn erase_at(&mut self, point: Point, tolerance: f64) -> Option<ElementId> {
        let (remaining, removed) = hit::erase_at(point, &self.elements, tolerance)?;
        self.commit(remaining);
        Some(removed)
    }

    /// Remove an element by id. A missing id records nothing.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        let remaining = self.elements.iter().filter(|e| e.id() != id).cloned().collect();
        self.commit(remaining);
        true
    }

    /// Remove every element as one undoable step.
    pub fn clear(&mut self) -> bool {
        if self.elements.is_empty() {
            return false;
        }
        self.commit(Vec::new());
        true
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.elements)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.elements)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop history and start over with the given depth.
    pub fn reset_history(&mut self, depth: usize) {
        self.history = History::new(depth);
    }
}

/// Changes the host should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A page's element list changed.
    ElementsChanged { page_id: PageId },
    /// Pages were added, removed or reordered.
    PagesChanged,
    /// Some source pages could not be imported.
    ImportFailed { pages: Vec<u32> },
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

/// An ordered collection of pages. Always holds at least one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pages: Vec<Page>,
    pub last_modified: DateTime<Utc>,
    #[serde(skip)]
    current: usize,
    #[serde(skip)]
    events: Vec<DocumentEvent>,
    #[serde(skip, default = "default_history_depth")]
    history_depth: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Document {
    /// New document with one blank page.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_history_depth(name, DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_history_depth(name: impl Into<String>, history_depth: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            pages: vec![Page::new(history_depth)],
            last_modified: Utc::now(),
            current: 0,
            events: Vec::new(),
            history_depth,
        }
    }

    pub fn history_depth(&self) -> usize {
        self.history_depth
    }

    /// Change the per-page depth. Existing histories are dropped.
    pub fn set_history_depth(&mut self, depth: usize) {
        self.history_depth = depth;
        for page in &mut self.pages {
            page.reset_history(depth);
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_by_id(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    /// Direct access to the current page. Changes made through it are not
    /// queued as events; call [`Document::mark_elements_changed`] afterwards.
    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current]
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Queue an `ElementsChanged` event for the current page.
    pub fn mark_elements_changed(&mut self) {
        let page_id = self.current_page().id;
        self.touch();
        self.events.push(DocumentEvent::ElementsChanged { page_id });
    }

    fn pages_changed(&mut self) {
        self.touch();
        self.events.push(DocumentEvent::PagesChanged);
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Append a blank page and make it current.
    pub fn add_page(&mut self) -> PageId {
        let page = Page::new(self.history_depth);
        let id = page.id;
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        log::info!("Added page {} ({} total)", self.current + 1, self.pages.len());
        self.pages_changed();
        id
    }

    /// Delete a page. The last remaining page is never deleted.
    pub fn delete_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }
        self.pages.remove(index);
        if self.current > index || self.current >= self.pages.len() {
            self.current -= 1;
        }
        log::info!("Deleted page {} ({} left)", index + 1, self.pages.len());
        self.pages_changed();
        true
    }

    pub fn set_current_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Move a page to a new position. The current page stays selected.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.pages.len() || to >= self.pages.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let current_id = self.current_page().id;
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.current = self.pages.iter().position(|p| p.id == current_id).unwrap_or(0);
        self.pages_changed();
        true
    }

    /// Append one page per rasterized source page, in the order given,
    /// and select the first one added. Failed pages are skipped and
    /// reported once.
    pub fn import_pages(&mut self, file_name: &str, rasters: Vec<RasterPage>) -> ImportReport {
        let total = rasters.len();
        let mut report = ImportReport::default();

        for raster in rasters {
            match raster.image {
                Ok(image) => {
                    let mut page = Page::new(self.history_depth);
                    page.background_image = Some(image.url);
                    page.source_import_tag = Some(SourceImportTag {
                        file_name: file_name.to_string(),
                        page_number: raster.page_number,
                    });
                    report.added.push(page.id);
                    self.pages.push(page);
                }
                Err(reason) => {
                    log::debug!("Skipping page {} of {}: {}", raster.page_number, file_name, reason);
                    report.failed_pages.push(raster.page_number);
                }
            }
        }

        if let Some(&first) = report.added.first() {
            report.first_added = Some(first);
            self.current = self.pages.len() - report.added.len();
            self.pages_changed();
        }
        log::info!("Imported {} of {} pages from {}", report.added.len(), total, file_name);

        if !report.failed_pages.is_empty() {
            let err = ImportError::PartialImport {
                file_name: file_name.to_string(),
                imported: report.added.len(),
                total,
                failed: report.failed_pages.clone(),
            };
            log::warn!("{err}");
            self.events.push(DocumentEvent::ImportFailed {
                pages: report.failed_pages.clone(),
            });
            report.error = Some(err);
        }

        report
    }

    /// Add an element to the current page.
    pub fn append_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        log::debug!("Committed {} {}", element.kind_name(), id);
        self.current_page_mut().append(element);
        self.mark_elements_changed();
        id
    }

    /// Erase the topmost element at `point` on the current page.
    pub fn erase_at(&mut self, point: Point, tolerance: f64) -> Option<ElementId> {
        let removed = self.current_page_mut().erase_at(point, tolerance)?;
        log::debug!("Erased {removed}");
        self.mark_elements_changed();
        Some(removed)
    }

    /// Replace the current page's element list as one undoable step.
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        self.current_page_mut().commit(elements);
        self.mark_elements_changed();
    }

    pub fn clear_page(&mut self) -> bool {
        let cleared = self.current_page_mut().clear();
        if cleared {
            self.mark_elements_changed();
        }
        cleared
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.current_page_mut().undo();
        if undone {
            log::debug!("Undo on page {}", self.current + 1);
            self.mark_elements_changed();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.current_page_mut().redo();
        if redone {
            log::debug!("Redo on page {}", self.current + 1);
            self.mark_elements_changed();
        }
        redone
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a stored document. An empty page list gets one blank page.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        if doc.pages.is_empty() {
            doc.pages.push(Page::new(doc.history_depth));
        }
        Ok(doc)
    }
}
