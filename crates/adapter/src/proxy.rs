//! HTTP <-> native event translation for local runs.
//!
//! A `GET /<route_prefix>?number=N` request becomes a [`NativeEvent`] with method `POST` (the
//! verb the function is deployed behind) and the request's query parameters. The handler's
//! body and content type are returned verbatim.

use crate::error::{AdapterError, Result};
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use iac_handler::event::JSON_MIME_TYPE;
use iac_handler::{HandlerError, NativeEvent, NativeResponse, RequestHandler};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Method every translated event carries, whatever the inbound verb was.
pub const FORWARDED_METHOD: &str = "POST";
/// `number` used when the local request does not specify one.
pub const DEFAULT_LOCAL_NUMBER: &str = "1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ROUTE_PREFIX: &str = "fibonacci";

/// The function behind the local listener.
#[async_trait]
pub trait NativeInvoker: Send + Sync + 'static {
    async fn invoke(&self, event: NativeEvent) -> std::result::Result<NativeResponse, HandlerError>;
}

#[async_trait]
impl NativeInvoker for RequestHandler {
    async fn invoke(&self, event: NativeEvent) -> std::result::Result<NativeResponse, HandlerError> {
        self.handle(&event).await
    }
}

/// Build the native event for a local request.
///
/// Every query parameter is carried over unchanged, keeping the first value of a repeated key;
/// `number` is added only when missing.
#[must_use]
pub fn to_native_event<I>(path: &str, pairs: I) -> NativeEvent
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut query = BTreeMap::new();
    for (key, value) in pairs {
        query.entry(key).or_insert(value);
    }
    query
        .entry(iac_handler::handler::NUMBER_PARAM.to_string())
        .or_insert_with(|| DEFAULT_LOCAL_NUMBER.to_string());
    NativeEvent::new(path, FORWARDED_METHOD, query)
}

fn to_http_response(resp: &NativeResponse) -> Response {
    let status = StatusCode::from_u16(resp.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resp.content_type().unwrap_or(JSON_MIME_TYPE).to_string();
    (
        status,
        [(header::CONTENT_TYPE, content_type)],
        resp.body().to_string(),
    )
        .into_response()
}

/// Route path for a prefix (`"fibonacci"`, `"/fibonacci/"` -> `"/fibonacci"`).
pub fn route_path(route_prefix: &str) -> Result<String> {
    let trimmed = route_prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(AdapterError::Config("route prefix must not be empty".to_string()));
    }
    if trimmed == "health" {
        return Err(AdapterError::Config(
            "route prefix 'health' is reserved".to_string(),
        ));
    }
    if trimmed.contains(['{', '}', '*', '?', '#']) {
        return Err(AdapterError::Config(format!(
            "route prefix '{trimmed}' contains reserved characters"
        )));
    }
    Ok(format!("/{trimmed}"))
}

async fn invoke_route(
    State(invoker): State<Arc<dyn NativeInvoker>>,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let event = to_native_event(uri.path(), pairs);
    tracing::debug!(path = %event.path(), params = ?event.query_string_parameters(), "forwarding local request");

    match invoker.invoke(event).await {
        Ok(resp) => to_http_response(&resp),
        Err(e) => {
            tracing::error!(error = %e, "handler invocation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(invoker: Arc<dyn NativeInvoker>, route_prefix: &str) -> Result<Router> {
    let route = route_path(route_prefix)?;
    Ok(Router::new()
        .route(&route, get(invoke_route))
        .route("/health", get(health))
        .with_state(invoker))
}

/// Bind on all interfaces and serve until the process exits.
pub async fn serve(invoker: Arc<dyn NativeInvoker>, route_prefix: &str, port: u16) -> Result<()> {
    let route = route_path(route_prefix)?;
    let app = router(invoker, route_prefix)?;
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| AdapterError::Bind { addr, source })?;

    tracing::info!("local lambda proxy running on http://{addr}{route}");
    axum::serve(listener, app)
        .await
        .map_err(AdapterError::Runtime)
}
