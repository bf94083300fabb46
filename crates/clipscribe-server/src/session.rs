use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use clipscribe_session::{SessionResolver, session_token};
use http::StatusCode;

/// Resolve the caller's session and attach it to the request
///
/// Requests without a token pass through untouched; handlers that need a
/// session reject them. Public paths skip resolution entirely. A token the
/// resolver cannot check is refused here, since the caller cannot be told
/// apart from an anonymous one.
pub async fn session_middleware(
    resolver: Arc<dyn SessionResolver>,
    cookie_name: Arc<str>,
    public_paths: Arc<[String]>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if public_paths.iter().any(|p| path.starts_with(p.as_str())) {
        return next.run(request).await;
    }

    let Some(token) = session_token(request.headers(), &cookie_name) else {
        return next.run(request).await;
    };

    match resolver.resolve(token).await {
        Ok(Some(session)) => {
            tracing::debug!(user_id = %session.user_id, "session resolved");
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!("session token not recognized");
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "session resolution failed");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
