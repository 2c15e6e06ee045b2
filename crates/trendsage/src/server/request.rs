//! Request metadata extraction and error responses.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ServiceError;
use crate::models::ErrorBody;
use crate::services::Requester;

/// Header carrying the client-generated session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Session id used when the client sends none.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Caller identity gathered from headers and the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta(pub Requester);

impl RequestMeta {
    /// Pick the body's session id, else the header's, else `anonymous`.
    #[must_use]
    pub fn session_or(&self, body: Option<String>) -> String {
        body.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| self.0.session_id.clone())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let session_id =
            header_str(headers, SESSION_HEADER).unwrap_or(ANONYMOUS_SESSION).to_string();
        let user_agent = header_str(headers, "user-agent").map(str::to_string);

        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(str::to_string);
        let ip = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(Self(Requester { session_id, user_agent, ip }))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// JSON error response with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
        Self { status, body: ErrorBody { error: error.into(), message } }
    }

    /// 404 for unknown routes.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Endpoint not found", None)
    }

    /// Status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Validation { error, message, .. } => {
                Self::new(StatusCode::BAD_REQUEST, error.clone(), Some(message.clone()))
            }
            ServiceError::Provider(source) => {
                tracing::error!(error = %source, "Provider call failed");
                Self::new(StatusCode::BAD_GATEWAY, "Provider error", Some(err.to_user_message()))
            }
            ServiceError::Serialization(_) | ServiceError::Internal(_) => {
                tracing::error!(error = %err, "Request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    Some("Something went wrong".to_string()),
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request", Some(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RequestMeta {
        let (mut parts, ()) = request.into_parts();
        RequestMeta::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_defaults_without_headers() {
        let meta = extract(Request::builder().uri("/").body(()).unwrap()).await;
        assert_eq!(meta.0, Requester::default());
    }

    #[tokio::test]
    async fn test_reads_session_agent_and_first_forwarded_hop() {
        let request = Request::builder()
            .uri("/")
            .header(SESSION_HEADER, "sess-42")
            .header("user-agent", "curl/8.0")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        let meta = extract(request).await;
        assert_eq!(meta.0.session_id, "sess-42");
        assert_eq!(meta.0.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(meta.0.ip.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn test_falls_back_to_peer_address() {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        let meta = extract(request).await;
        assert_eq!(meta.0.ip.as_deref(), Some("192.0.2.1"));
    }

    #[test]
    fn test_session_precedence() {
        let meta = RequestMeta(Requester { session_id: "header".into(), ..Requester::default() });
        assert_eq!(meta.session_or(Some("body".into())), "body");
        assert_eq!(meta.session_or(Some("  ".into())), "header");
        assert_eq!(meta.session_or(None), "header");
        assert_eq!(RequestMeta(Requester::default()).session_or(None), "anonymous");
    }

    #[test]
    fn test_status_mapping() {
        let validation = ServiceError::validation("query", "Query too short", "too short");
        assert_eq!(ApiError::from(validation).status(), StatusCode::BAD_REQUEST);

        let provider = ServiceError::Provider(crate::error::ClientError::server(500, "boom"));
        assert_eq!(ApiError::from(provider).status(), StatusCode::BAD_GATEWAY);

        assert_eq!(
            ApiError::from(ServiceError::internal("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
