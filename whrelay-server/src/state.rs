//! Application state shared across all request handlers.

use crate::config::runtime::{MessagesConfig, UpstreamConfig};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use whrelay_core::templates::{self, FileTemplateStore};
use whrelay_core::MessagePipeline;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// The active message pipeline (replaced on SIGHUP reload).
    pub pipeline: Arc<RwLock<Arc<MessagePipeline>>>,
    /// Where requests are forwarded to.
    pub upstream: Arc<UpstreamConfig>,
    /// Client used for every forwarded request.
    pub http_client: reqwest::Client,
    /// Raised when a template lookup fails; the server then shuts down.
    halt: watch::Sender<bool>,
}

impl AppState {
    /// Create a new AppState around the initial pipeline.
    pub fn new(
        pipeline: MessagePipeline,
        upstream: UpstreamConfig,
        http_client: reqwest::Client,
    ) -> Self {
        let (halt, _) = watch::channel(false);
        Self {
            pipeline: Arc::new(RwLock::new(Arc::new(pipeline))),
            upstream: Arc::new(upstream),
            http_client,
            halt,
        }
    }

    /// The pipeline to use for one request.
    pub async fn pipeline(&self) -> Arc<MessagePipeline> {
        self.pipeline.read().await.clone()
    }

    /// Swap in a new pipeline. Requests already holding the old one finish
    /// with it.
    pub async fn replace_pipeline(&self, pipeline: MessagePipeline) {
        let mut current = self.pipeline.write().await;
        *current = Arc::new(pipeline);
    }

    /// Ask the server to stop serving.
    pub fn halt(&self) {
        self.halt.send_replace(true);
    }

    pub fn is_halted(&self) -> bool {
        *self.halt.borrow()
    }

    /// Resolves once [`halt`](Self::halt) has been called.
    pub fn halted(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.halt.subscribe();
        async move {
            // The sender lives as long as any AppState clone, so an error
            // here only happens after the server is gone.
            let _ = rx.wait_for(|halted| *halted).await;
        }
    }
}

/// Build a pipeline for `messages`, checking that all templates of the
/// style exist.
pub fn build_pipeline(messages: &MessagesConfig) -> anyhow::Result<MessagePipeline> {
    let store = FileTemplateStore::new(&messages.directory);
    templates::verify_style(&store, &messages.style)?;
    Ok(MessagePipeline::new(
        messages.style.clone(),
        Arc::new(store),
    )?)
}
