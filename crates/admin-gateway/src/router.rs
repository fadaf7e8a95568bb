//! REST surface: one route per action, all served by the generic
//! [`ActionDispatcher`].

use crate::dispatch::binder::RawInput;
use crate::dispatch::dispatcher::ActionDispatcher;
use crate::dispatch::translator::Resolved;
use crate::domain::config::GatewayConfig;
use crate::domain::envelope::ResponseEnvelope;
use crate::domain::error::{codes, BindingError};
use crate::domain::identity::CallerIdentity;
use crate::domain::requests::*;
use crate::middleware::{create_cors_layer, AuthLayer, GatewayMetrics, TracingLayer};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, rejection::PathRejection, rejection::QueryRejection},
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: ActionDispatcher,
    pub metrics: Arc<GatewayMetrics>,
}

/// Build the complete router: action routes under the configured prefix,
/// health and metrics at the root.
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    let actions = action_routes()
        .method_not_allowed_fallback(route_not_found)
        .layer(AuthLayer::new(&config.auth, Arc::clone(&state.metrics)));

    let prefix = config.http.route_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(actions)
    } else {
        Router::new().nest(prefix, actions)
    };

    let router = router
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_json));
    #[cfg(feature = "metrics")]
    let router = router.route("/metrics/prometheus", get(metrics_prometheus));

    // A wrong method on a known path is answered like an unknown path
    router
        .method_not_allowed_fallback(route_not_found)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(config.limits.max_request_size))
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new())
        .with_state(state)
}

fn action_routes() -> Router<AppState> {
    Router::new()
        // ═══════════════════════════════════════════════════════════════════
        // USERS
        // ═══════════════════════════════════════════════════════════════════
        .route("/users", get(action::<ListUsersRequest>))
        .route("/users/ban", post(action::<BanUserRequest>))
        .route("/users/unban", post(action::<UnbanUserRequest>))
        .route("/users/change-role", post(action::<ChangeUserRoleRequest>))
        .route("/users/uploads-block", post(action::<SetUploadBlockRequest>))
        .route("/users/delete", delete(action::<DeleteUserRequest>))
        // ═══════════════════════════════════════════════════════════════════
        // CHANNELS
        // ═══════════════════════════════════════════════════════════════════
        .route("/channels", get(action::<ListChannelsRequest>))
        .route("/channels/:id", get(action_by_id::<GetChannelRequest>))
        .route("/channels/freeze", post(action::<FreezeChannelRequest>))
        .route("/channels/unfreeze", post(action::<UnfreezeChannelRequest>))
        .route("/channels/delete", delete(action::<DeleteChannelRequest>))
        // ═══════════════════════════════════════════════════════════════════
        // FILES
        // ═══════════════════════════════════════════════════════════════════
        .route("/files", get(action::<ListFilesRequest>))
        .route("/files/delete", delete(action::<DeleteFileRequest>))
        .route("/files/:id", delete(action_by_id::<DeleteFileRequest>))
}

type QueryParams = Result<Query<HashMap<String, String>>, QueryRejection>;

/// Handler for actions addressed by body and query only
async fn action<R: ActionRequest>(
    State(state): State<AppState>,
    caller: Option<Extension<CallerIdentity>>,
    query: QueryParams,
    body: Result<Bytes, BytesRejection>,
) -> Resolved {
    match raw_input(caller, query, body) {
        Ok(input) => state.dispatcher.dispatch::<R>(input).await,
        Err(e) => state.dispatcher.refuse::<R>(&e),
    }
}

/// Handler for actions whose id arrives as a `:id` path segment
async fn action_by_id<R: ActionRequest>(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    caller: Option<Extension<CallerIdentity>>,
    query: QueryParams,
    body: Result<Bytes, BytesRejection>,
) -> Resolved {
    let input = raw_input(caller, query, body).and_then(|input| {
        let Path(id) = path.map_err(|e| BindingError::Malformed(e.body_text()))?;
        Ok(match R::ACTION.descriptor().id_field {
            Some(field) => input.with_path(field, id),
            None => input,
        })
    });
    match input {
        Ok(input) => state.dispatcher.dispatch::<R>(input).await,
        Err(e) => state.dispatcher.refuse::<R>(&e),
    }
}

fn raw_input(
    caller: Option<Extension<CallerIdentity>>,
    query: QueryParams,
    body: Result<Bytes, BytesRejection>,
) -> Result<RawInput, BindingError> {
    let Query(query) = query.map_err(|e| BindingError::Malformed(e.body_text()))?;
    let body = body.map_err(|e| BindingError::Malformed(e.body_text()))?;

    let query: Map<String, Value> = query
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    Ok(RawInput {
        body,
        query,
        path: Map::new(),
        caller: caller.map(|Extension(c)| c),
    })
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "admin-gateway",
        "version": crate::VERSION,
    }))
}

async fn metrics_json(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}

#[cfg(feature = "metrics")]
async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        state.metrics.to_prometheus(),
    )
}

async fn route_not_found() -> impl IntoResponse {
    let status = StatusCode::NOT_FOUND;
    (
        status,
        Json(ResponseEnvelope::failure(
            status.as_u16(),
            codes::NOT_FOUND,
            "route not found",
        )),
    )
}
