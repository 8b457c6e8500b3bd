//! Request-id propagation.
//!
//! Every request gets an id (caller-supplied `x-request-id` or a fresh UUID)
//! scoped through a tokio task-local, so response envelopes and error bodies
//! can echo it without threading it through every signature.

use std::future::Future;

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

tokio::task_local! {
    static REQUEST_ID: RequestId;
}

/// The request id of the current task, if one is in scope.
pub fn current_request_id() -> Option<RequestId> {
    REQUEST_ID.try_with(|rid| rid.clone()).ok()
}

/// Runs `fut` with `rid` in scope; used by tests and the middleware below.
pub async fn scope_request_id<F: Future>(rid: RequestId, fut: F) -> F::Output {
    REQUEST_ID.scope(rid, fut).await
}

/// Ensures every request carries a request id and echoes it on the response.
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let rid = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = REQUEST_ID
        .scope(RequestId::new(rid.clone()), next.run(req))
        .await;

    if let Ok(value) = HeaderValue::from_str(&rid) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_id_is_visible_inside_scope() {
        let seen = scope_request_id(RequestId::new("rid-123"), async {
            current_request_id().map(|rid| rid.as_str().to_string())
        })
        .await;
        assert_eq!(seen.as_deref(), Some("rid-123"));
    }

    #[tokio::test]
    async fn request_id_is_absent_outside_scope() {
        assert!(current_request_id().is_none());
    }
}
