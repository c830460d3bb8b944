//! Axum server setup and router configuration.

use crate::proxy::proxy_request;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
///
/// Everything except the health check is proxied to the upstream.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .fallback(proxy_request)
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server until `shutdown` resolves, then drain in-flight requests.
pub async fn run_server(
    router: Router,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::UpstreamConfig;
    use axum::{
        body::{Body, Bytes},
        http::{HeaderMap, Method, Request, StatusCode, Uri, header},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use whrelay_core::{MemoryTemplateStore, MessagePipeline};
    use whrelay_sdk::objects::EventType;

    /// What the fake upstream saw.
    #[derive(Debug, Clone)]
    struct Seen {
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    }

    /// Start an upstream that records the request and answers 204 with a
    /// rate-limit header.
    async fn spawn_upstream() -> (SocketAddr, tokio::sync::mpsc::UnboundedReceiver<Seen>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(Seen {
                        method,
                        uri,
                        headers,
                        body,
                    });
                    (StatusCode::NO_CONTENT, [("x-ratelimit-remaining", "4")])
                }
            },
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, rx)
    }

    fn templates() -> MemoryTemplateStore {
        let mut store = MemoryTemplateStore::new();
        for event_type in EventType::ALL {
            store.insert(
                "simple",
                event_type,
                r#"{"content":"${TYPE} #${MESSAGE_NUMBER} ${PAIR}"}"#,
            );
        }
        store
    }

    fn state_for(upstream: SocketAddr, store: MemoryTemplateStore) -> AppState {
        AppState::new(
            MessagePipeline::new("simple", Arc::new(store)).unwrap(),
            UpstreamConfig {
                url: url::Url::parse(&format!("http://{upstream}")).unwrap(),
                timeout: Duration::from_secs(5),
            },
            reqwest::Client::builder().no_proxy().build().unwrap(),
        )
    }

    fn webhook_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/webhooks/123/token?wait=true")
            .header(header::HOST, "localhost:8082")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (addr, _rx) = spawn_upstream().await;
        let response = build_router(state_for(addr, templates()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recognised_webhook_is_rewritten() {
        let (addr, mut rx) = spawn_upstream().await;
        let router = build_router(state_for(addr, templates()));

        let response = router
            .oneshot(webhook_request(r#"{"content":"'42' Bot Started"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "4");

        let seen = rx.recv().await.unwrap();
        let expected = r#"{"content":"start #42 "}"#;
        assert_eq!(seen.method, Method::POST);
        assert_eq!(seen.uri.path(), "/api/webhooks/123/token");
        assert_eq!(seen.uri.query(), Some("wait=true"));
        assert_eq!(seen.body, expected.as_bytes());
        assert_eq!(
            seen.headers[header::CONTENT_LENGTH],
            expected.len().to_string().as_str()
        );
        assert_eq!(seen.headers[header::HOST], addr.to_string().as_str());
        assert_eq!(seen.headers[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_unrecognised_webhook_passes_through() {
        let (addr, mut rx) = spawn_upstream().await;
        let router = build_router(state_for(addr, templates()));
        let body = r#"{"content":"hello from a human"}"#;

        let response = router.oneshot(webhook_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.body, body.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_template_halts() {
        let (addr, mut rx) = spawn_upstream().await;
        let store = MemoryTemplateStore::new().with("simple", EventType::Open, "open");
        let state = state_for(addr, store);
        let router = build_router(state.clone());

        let response = router
            .oneshot(webhook_request(r#"{"content":"'42' Bot Started"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.is_halted());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        // Bind then drop to get a port nothing listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let router = build_router(state_for(addr, templates()));

        let response = router
            .oneshot(webhook_request(r#"{"content":"'1' Bot Stopped"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let (addr, _rx) = spawn_upstream().await;
        let router = build_router(state_for(addr, templates()));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/webhooks/1/t")
            .header(header::CONTENT_LENGTH, crate::proxy::MAX_BODY_BYTES + 1)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
