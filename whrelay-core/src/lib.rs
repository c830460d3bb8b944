#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod decode;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod templates;

pub use pipeline::{MessagePipeline, PipelineError};
pub use templates::{FileTemplateStore, MemoryTemplateStore, TemplateError, TemplateStore};
