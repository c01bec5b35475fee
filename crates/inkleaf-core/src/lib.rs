//! Inkleaf Core Library
//!
//! Vector annotation engine shared by the notebook and PDF review surfaces:
//! ink capture, shape primitives, hit-testing, bounded history, pages and
//! debounced persistence. Everything here works in document space; the
//! host surface owns windows, input devices and network I/O.

pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod gesture;
pub mod history;
pub mod hit;
pub mod import;
pub mod outline;
pub mod storage;
pub mod viewport;

pub use config::{ConfigError, EngineConfig};
pub use document::{Document, DocumentEvent, Page, PageId, SourceImportTag};
pub use editor::Editor;
pub use elements::{Element, ElementId, ElementTrait, SerializableColor};
pub use gesture::{GestureState, PointerEvent, Session, Tool};
pub use history::{BoundedStack, History};
pub use hit::{erase_at, find_topmost};
pub use import::{BackgroundImage, ImportError, ImportReport, RasterPage};
pub use outline::{Outline, StrokeOptions};
pub use storage::{AutoSaver, FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use viewport::{DocumentSpace, Viewport};
