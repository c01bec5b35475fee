//! Engine configuration.
//!
//! Everything here is tuning, not protocol: changing a value never changes
//! the persisted page format.

use crate::outline::StrokeOptions;
use crate::viewport::DocumentSpace;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default undo/redo depth per page.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Default debounce window before persisting changes.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Tunables for one host surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Units of document space.
    pub document_space: DocumentSpace,
    /// Undo/redo entries kept per page.
    pub history_depth: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Strokes with fewer samples are discarded as taps.
    pub min_stroke_samples: usize,
    /// Drag shapes smaller than this (document units) are discarded.
    pub min_shape_size: f64,
    /// Eraser hit tolerance in document units.
    pub hit_tolerance: f64,
    pub stroke: StrokeOptions,
    /// RDP tolerance applied to strokes on commit.
    pub simplify_tolerance: Option<f64>,
    pub autosave_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::notebook()
    }
}

impl EngineConfig {
    /// Multi-page notebook: fixed logical page, deep history.
    pub fn notebook() -> Self {
        Self {
            document_space: DocumentSpace::Logical {
                width: 1000.0,
                height: 1414.0,
            },
            history_depth: DEFAULT_HISTORY_DEPTH,
            min_zoom: 0.2,
            max_zoom: 3.0,
            min_stroke_samples: 3,
            min_shape_size: 2.0,
            hit_tolerance: 6.0,
            stroke: StrokeOptions::default(),
            simplify_tolerance: Some(0.5),
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
        }
    }

    /// Markup over a rasterized PDF page: percentage space, shallow history.
    pub fn pdf_review() -> Self {
        Self {
            document_space: DocumentSpace::Percent,
            history_depth: 3,
            min_shape_size: 0.5,
            hit_tolerance: 1.0,
            simplify_tolerance: None,
            ..Self::notebook()
        }
    }

    /// Parse overrides from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load overrides from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn autosave_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_debounce_ms)
    }
}
