//! Debounced persistence.
//!
//! Edits mark the saver dirty and restart a quiet window. Once the window
//! elapses the host takes a [`PendingFlush`] snapshot, writes it with
//! whatever backend it likes, and reports back. Editing continues while a
//! write is in flight; a generation counter tells whether the write still
//! covers the latest edit.

use crate::config::DEFAULT_AUTOSAVE_DEBOUNCE_MS;
use crate::document::{Document, DocumentEvent};
use crate::storage::{Storage, StorageError, StorageResult};
use std::time::{Duration, Instant};

/// Snapshot of a document taken for one write.
#[derive(Debug, Clone)]
pub struct PendingFlush {
    /// Edit generation this snapshot covers.
    pub generation: u64,
    pub document: Document,
}

/// Debounce and bookkeeping for document saves.
#[derive(Debug, Clone)]
pub struct AutoSaver {
    debounce: Duration,
    /// Bumped on every edit.
    generation: u64,
    saved_generation: u64,
    last_edit: Option<Instant>,
    in_flight: Option<u64>,
    last_error: Option<String>,
}

impl Default for AutoSaver {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS))
    }
}

impl AutoSaver {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            generation: 0,
            saved_generation: 0,
            last_edit: None,
            in_flight: None,
            last_error: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record an edit at `now`, restarting the quiet window.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.generation += 1;
        self.last_edit = Some(now);
    }

    /// Mark dirty if any event changed persisted state.
    pub fn observe(&mut self, events: &[DocumentEvent], now: Instant) {
        let changed = events.iter().any(|event| {
            matches!(
                event,
                DocumentEvent::ElementsChanged { .. } | DocumentEvent::PagesChanged
            )
        });
        if changed {
            self.mark_dirty(now);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.generation > self.saved_generation
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Message from the most recent failed write, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True once the document is dirty, quiet for the debounce window,
    /// and no write is in flight.
    pub fn should_flush(&self, now: Instant) -> bool {
        if !self.is_dirty() || self.is_saving() {
            return false;
        }
        match self.last_edit {
            Some(last) => now.saturating_duration_since(last) >= self.debounce,
            None => true,
        }
    }

    /// Snapshot the document for a write. `None` if clean or already writing.
    pub fn begin_flush(&mut self, document: &Document) -> Option<PendingFlush> {
        if !self.is_dirty() || self.is_saving() {
            return None;
        }
        self.in_flight = Some(self.generation);
        Some(PendingFlush {
            generation: self.generation,
            document: document.clone(),
        })
    }

    /// Record the outcome of a write started with [`AutoSaver::begin_flush`].
    /// Returns true if the write succeeded.
    pub fn finish_flush(&mut self, generation: u64, result: StorageResult<()>) -> bool {
        match result {
            Ok(()) => {
                self.record_success(generation);
                true
            }
            Err(e) => {
                self.record_failure(generation, &e);
                false
            }
        }
    }

    fn record_success(&mut self, generation: u64) {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }
        self.saved_generation = self.saved_generation.max(generation);
        self.last_error = None;
        log::info!("Saved document (generation {})", generation);
    }

    fn record_failure(&mut self, generation: u64, error: &StorageError) {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }
        log::warn!("Failed to save document: {}", error);
        self.last_error = Some(error.to_string());
    }

    /// Save immediately, ignoring the debounce window.
    pub async fn flush_now<S: Storage + ?Sized>(&mut self, storage: &S, document: &Document) -> StorageResult<()> {
        let generation = self.generation;
        self.in_flight = Some(generation);
        match storage.save(&document.id, document).await {
            Ok(()) => {
                self.record_success(generation);
                Ok(())
            }
            Err(e) => {
                self.record_failure(generation, &e);
                Err(e)
            }
        }
    }

    /// Save if the debounce window has elapsed. Returns true if a write happened.
    pub async fn maybe_flush<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        document: &Document,
        now: Instant,
    ) -> StorageResult<bool> {
        if !self.should_flush(now) {
            return Ok(false);
        }
        self.flush_now(storage, document).await?;
        Ok(true)
    }
}
