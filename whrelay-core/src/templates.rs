//! Template lookup.
//!
//! Templates are grouped by style. On disk a style is a directory holding
//! one file per event type:
//!
//! ```text
//! messages/
//! └── simple/
//!     ├── open.json
//!     ├── dca.json
//!     ├── close.json
//!     ├── isolation.json
//!     ├── start.json
//!     └── stop.json
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use whrelay_sdk::objects::EventType;

/// Template lookup failure. The renderer cannot continue without the
/// template, so every variant is treated as fatal by the pipeline host.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {template} not found for style {style:?}")]
    Missing { style: String, template: String },

    #[error("failed to read template {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid style name {0:?}")]
    InvalidStyle(String),
}

/// Source of raw template text, keyed by style and event type.
pub trait TemplateStore: Send + Sync {
    fn fetch(&self, style: &str, event_type: EventType) -> Result<String, TemplateError>;
}

/// Whether `style` is usable as a single directory name.
pub fn is_valid_style(style: &str) -> bool {
    !style.is_empty()
        && style != "."
        && style != ".."
        && !style.contains(['/', '\\'])
        && !style.contains("..")
}

/// Fetch every template of `style`, failing on the first one missing.
pub fn verify_style(store: &dyn TemplateStore, style: &str) -> Result<(), TemplateError> {
    for event_type in EventType::ALL {
        store.fetch(style, event_type)?;
    }
    Ok(())
}

// -- FileTemplateStore --------------------------------------------------

/// Reads templates from `<root>/<style>/<tag>.json` on every lookup.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    root: PathBuf,
}

impl FileTemplateStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn template_path(&self, style: &str, event_type: EventType) -> PathBuf {
        self.root.join(style).join(event_type.template_file())
    }
}

impl TemplateStore for FileTemplateStore {
    fn fetch(&self, style: &str, event_type: EventType) -> Result<String, TemplateError> {
        if !is_valid_style(style) {
            return Err(TemplateError::InvalidStyle(style.to_owned()));
        }

        let path = self.template_path(style, event_type);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => TemplateError::Missing {
                style: style.to_owned(),
                template: event_type.template_file(),
            },
            _ => TemplateError::Unreadable { path, source },
        })
    }
}

// -- MemoryTemplateStore ------------------------------------------------

/// Templates held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<(String, EventType), String>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one template.
    pub fn insert(&mut self, style: impl Into<String>, event_type: EventType, text: impl Into<String>) {
        self.templates.insert((style.into(), event_type), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, style: impl Into<String>, event_type: EventType, text: impl Into<String>) -> Self {
        self.insert(style, event_type, text);
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn fetch(&self, style: &str, event_type: EventType) -> Result<String, TemplateError> {
        self.templates
            .get(&(style.to_owned(), event_type))
            .cloned()
            .ok_or_else(|| TemplateError::Missing {
                style: style.to_owned(),
                template: event_type.template_file(),
            })
    }
}
