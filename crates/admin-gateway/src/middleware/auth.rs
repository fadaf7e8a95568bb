//! Operator authentication middleware.
//!
//! Resolves the bearer token (or `X-API-Key`) to a configured operator and
//! attaches the [`CallerIdentity`] as a request extension. Runs in front of
//! the action routes only; health and metrics stay open.

use super::metrics::GatewayMetrics;
use crate::domain::config::{AuthConfig, OperatorCredential};
use crate::domain::envelope::ResponseEnvelope;
use crate::domain::error::codes;
use crate::domain::identity::CallerIdentity;
use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

struct AuthState {
    enabled: bool,
    operators: Vec<OperatorCredential>,
    metrics: Arc<GatewayMetrics>,
}

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    state: Arc<AuthState>,
}

impl AuthLayer {
    pub fn new(config: &AuthConfig, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            state: Arc::new(AuthState {
                enabled: config.enabled,
                operators: config.operators.clone(),
                metrics,
            }),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    state: Arc<AuthState>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if state.enabled {
                let identity = presented_token(&req)
                    .and_then(|token| authenticate(token, &state.operators));

                match identity {
                    Some(identity) => {
                        debug!(operator = %identity, "Operator authenticated");
                        req.extensions_mut().insert(identity);
                    }
                    None => {
                        warn!(path = %req.uri().path(), "Rejected unauthenticated admin request");
                        state.metrics.record_auth_rejection();
                        return Ok(unauthorized_response());
                    }
                }
            }

            inner.call(req).await
        })
    }
}

/// Token from `Authorization: Bearer` or `X-API-Key`
fn presented_token<B>(req: &Request<B>) -> Option<&str> {
    if let Some(auth) = req.headers().get(header::AUTHORIZATION) {
        if let Some(token) = auth.to_str().ok().and_then(|s| s.strip_prefix("Bearer ")) {
            return Some(token.trim());
        }
    }

    req.headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// Match `token` against every operator. All credentials are compared so
/// the time taken does not depend on which one matched.
fn authenticate(token: &str, operators: &[OperatorCredential]) -> Option<CallerIdentity> {
    let mut matched = None;
    for operator in operators {
        if constant_time_compare(token, &operator.token) && matched.is_none() {
            matched = CallerIdentity::new(operator.operator_id.clone());
        }
    }
    matched
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    // Pad both to the longer length so the comparison leaks no length
    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

fn unauthorized_response() -> Response {
    let envelope = ResponseEnvelope::failure(
        StatusCode::UNAUTHORIZED.as_u16(),
        codes::UNAUTHORIZED,
        "authentication required",
    );
    let mut response = (StatusCode::UNAUTHORIZED, Json(envelope)).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
