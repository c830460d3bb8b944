//! The message pipeline: decode, classify, extract, render.
//!
//! Anything the pipeline cannot understand is passed through unchanged, so
//! unrecognised notifications still reach their destination. The only
//! failure surfaced to the caller is a template lookup error, which leaves
//! the configured style unusable for every later message as well.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use whrelay_sdk::objects::ExtractedEvent;

use crate::classify::{ClassifyError, TitleClassifier};
use crate::decode::{DecodeError, decode};
use crate::extract::{DescriptionExtractor, ExtractError};
use crate::render::KeywordRenderer;
use crate::templates::{TemplateError, TemplateStore};

/// Why a payload was not rewritten.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Rewrites bot notifications into the configured style.
///
/// Holds no mutable state; share it behind an `Arc` and call it from any
/// number of threads.
#[derive(Clone)]
pub struct MessagePipeline {
    style: String,
    classifier: TitleClassifier,
    extractor: DescriptionExtractor,
    renderer: KeywordRenderer,
}

impl MessagePipeline {
    /// Build a pipeline rendering with `style` templates from `store`.
    pub fn new(
        style: impl Into<String>,
        store: Arc<dyn TemplateStore>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            style: style.into(),
            classifier: TitleClassifier::new()?,
            extractor: DescriptionExtractor::new()?,
            renderer: KeywordRenderer::new(store)?,
        })
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Rewrite `raw`, or return it unchanged when it is not a recognised
    /// notification.
    ///
    /// Returns `Err` only when the template for a recognised event cannot be
    /// loaded. The caller is expected to stop serving in that case.
    pub fn process(&self, raw: &[u8]) -> Result<Vec<u8>, TemplateError> {
        match self.try_process(raw) {
            Ok((event, body)) => {
                debug!(
                    event_type = %event.event_type,
                    message_number = event.message_number,
                    style = %self.style,
                    "Notification rewritten"
                );
                Ok(body)
            }
            Err(PipelineError::Template(e)) => Err(e),
            Err(PipelineError::Decode(e)) => {
                debug!(error = %e, "Passing payload through undecoded");
                Ok(raw.to_vec())
            }
            Err(e) => {
                warn!(error = %e, "Passing notification through unchanged");
                Ok(raw.to_vec())
            }
        }
    }

    /// Run every stage and return the extracted event with the rendered
    /// body, or the first stage error.
    pub fn try_process(&self, raw: &[u8]) -> Result<(ExtractedEvent, Vec<u8>), PipelineError> {
        let webhook = decode(raw)?;
        let headline = webhook.headline();

        let classification = self.classifier.classify(headline.title)?;
        let fields = self
            .extractor
            .extract(classification.event_type, headline.description)?;

        let event = ExtractedEvent {
            event_type: classification.event_type,
            message_number: classification.message_number,
            position_number: classification.position_number,
            pair: fields.pair,
            direction: fields.direction,
            number_of_buys: fields.number_of_buys,
            profit: fields.profit,
            color: 0,
        };

        let body = self.renderer.render(&event, &self.style)?;
        Ok((event, body))
    }
}
