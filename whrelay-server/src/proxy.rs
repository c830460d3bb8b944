//! Reverse proxy to the upstream chat platform.
//!
//! Every request that is not handled by another route ends up here. Its
//! body goes through the message pipeline once, then the request is sent to
//! the same path on the upstream and the upstream response is relayed back.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::state::AppState;

/// Largest request body accepted for rewriting.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Headers to send upstream.
///
/// `Host` and `Content-Length` are dropped so the client derives them from
/// the upstream URL and the (possibly rewritten) body. `Accept-Encoding` is
/// dropped so the client negotiates, and decodes, compression itself.
fn forward_request_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| {
            !is_hop_by_hop(name)
                && !matches!(name.as_str(), "host" | "content-length" | "accept-encoding")
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Headers to relay back to the caller.
fn forward_response_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name) && name.as_str() != "content-length")
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Fallback handler forwarding any request to the upstream.
pub async fn proxy_request(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let declared_length = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared_length.is_some_and(|length| length > MAX_BODY_BYTES) {
        return ProxyError::BodyTooLarge.into_response();
    }

    let raw = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Failed to read request body");
            return ProxyError::BodyRead.into_response();
        }
    };

    let body = if raw.is_empty() {
        raw
    } else {
        match rewrite_body(&state, raw).await {
            Ok(body) => body,
            Err(e) => return e.into_response(),
        }
    };

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = state.upstream.target(path_and_query);

    let upstream_response = state
        .http_client
        .request(parts.method.clone(), &target)
        .headers(forward_request_headers(&parts.headers))
        .body(body)
        .send()
        .await;

    let upstream_response = match upstream_response {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, method = %parts.method, "Failed to forward request upstream");
            return ProxyError::Upstream.into_response();
        }
    };

    let status = upstream_response.status();
    let headers = forward_response_headers(upstream_response.headers());
    let bytes = match upstream_response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Failed to read upstream response body");
            return ProxyError::Upstream.into_response();
        }
    };

    debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        status = %status,
        "Forwarded request"
    );

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Run the pipeline on a request body off the async runtime.
async fn rewrite_body(state: &AppState, raw: Bytes) -> Result<Bytes, ProxyError> {
    let pipeline = state.pipeline().await;
    let input = raw.clone();

    match tokio::task::spawn_blocking(move || pipeline.process(&input)).await {
        Ok(Ok(body)) => Ok(Bytes::from(body)),
        Ok(Err(e)) => {
            error!(error = %e, "Message template unavailable, halting");
            state.halt();
            Err(ProxyError::TemplateUnavailable)
        }
        Err(e) => {
            error!(error = %e, "Message pipeline task failed, forwarding original body");
            Ok(raw)
        }
    }
}

/// Errors answered by the proxy itself.
#[derive(Debug)]
enum ProxyError {
    BodyTooLarge,
    BodyRead,
    TemplateUnavailable,
    Upstream,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProxyError::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "request body too large"),
            ProxyError::BodyRead => (StatusCode::BAD_REQUEST, "failed to read request body"),
            ProxyError::TemplateUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "message template unavailable",
            ),
            ProxyError::Upstream => (StatusCode::BAD_GATEWAY, "upstream request failed"),
        };
        (status, message).into_response()
    }
}
