//! Internal error detail middleware
//!
//! Outside production, a 500 response carrying an [`InternalErrorDetail`]
//! extension has its body rewritten to include the detail as `stack`.
//! In production the generic body is sent unchanged.
//!
//! # Example
//!
//! ```no_run
//! use axum::Router;
//! use rentroll_api::middleware::error_detail::ErrorDetailLayer;
//!
//! let app: Router = Router::new()
//!     .layer(ErrorDetailLayer::new(false)); // false = expose detail
//! ```

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::{ErrorResponse, InternalErrorDetail};

/// Error detail middleware layer
#[derive(Clone)]
pub struct ErrorDetailLayer {
    production: bool,
}

impl ErrorDetailLayer {
    /// Creates a new layer; `production` suppresses the detail
    pub fn new(production: bool) -> Self {
        Self { production }
    }
}

impl<S> Layer<S> for ErrorDetailLayer {
    type Service = ErrorDetailMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorDetailMiddleware {
            inner,
            production: self.production,
        }
    }
}

/// Error detail middleware service
#[derive(Clone)]
pub struct ErrorDetailMiddleware<S> {
    inner: S,
    production: bool,
}

impl<S> Service<Request> for ErrorDetailMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let future = self.inner.call(request);
        let production = self.production;

        Box::pin(async move {
            let response = future.await?;

            if production || response.status() != StatusCode::INTERNAL_SERVER_ERROR {
                return Ok(response);
            }

            let Some(InternalErrorDetail(detail)) =
                response.extensions().get::<InternalErrorDetail>().cloned()
            else {
                return Ok(response);
            };

            let (mut parts, _) = response.into_parts();
            parts.headers.remove(axum::http::header::CONTENT_LENGTH);

            let body = Json(ErrorResponse::internal(Some(detail)))
                .into_response()
                .into_body();

            Ok(Response::from_parts(parts, body))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use axum::{body::Body, routing::get, Router};

    async fn failing() -> Result<&'static str, ApiError> {
        Err(ApiError::InternalError("disk on fire".to_string()))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_detail_exposed_outside_production() {
        let mut app = Router::new()
            .route("/fail", get(failing))
            .layer(ErrorDetailLayer::new(false));

        let response = app
            .call(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["stack"], "disk on fire");
    }

    #[tokio::test]
    async fn test_detail_hidden_in_production() {
        let mut app = Router::new()
            .route("/fail", get(failing))
            .layer(ErrorDetailLayer::new(true));

        let response = app
            .call(Request::builder().uri("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_other_responses_untouched() {
        let mut app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .layer(ErrorDetailLayer::new(false));

        let response = app
            .call(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"fine");
    }
}
