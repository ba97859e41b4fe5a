use crate::application::ports::{AssetRequest, AssetResponse};
use crate::application::services::{AssetCacheService, Interception};
use crate::shared::error::AppError;
use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

const MAX_REQUEST_BODY: usize = 2 * 1024 * 1024;

/// Every request goes through the offline cache; there are no other routes.
pub fn router(service: Arc<AssetCacheService>) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri()
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .fallback(intercept)
        .with_state(service)
        .layer(trace)
}

/// Installs the current generation and, once it is complete, drops older ones. A failed
/// install leaves the stored generations alone and keeps serving the newest of them.
pub async fn prepare(service: &AssetCacheService) {
    match service.install().await {
        Ok(assets) => {
            info!(version = service.version(), assets, "asset cache ready");
            if let Err(err) = service.activate().await {
                warn!(error = %err, "asset cache activation failed");
            }
        }
        Err(err) => {
            warn!(error = %err, "asset cache install failed");
            match service.resume_previous().await {
                Ok(Some(_)) => {}
                Ok(None) => warn!("no earlier asset cache generation; serving without it"),
                Err(err) => warn!(error = %err, "failed to read stored asset cache generations"),
            }
        }
    }
}

pub async fn serve(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

async fn intercept(State(service): State<Arc<AssetCacheService>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, MAX_REQUEST_BODY).await {
        Ok(body) => body,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let asset_request = AssetRequest {
        method: parts.method.as_str().to_string(),
        path: parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string()),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    };

    let result = match service.respond(&asset_request).await {
        Ok(Interception::Served(response)) => Ok(response),
        Ok(Interception::Bypassed) => service.forward(&asset_request).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(response) => to_http(response),
        Err(err) => unavailable(&asset_request.path, err),
    }
}

fn to_http(response: AssetResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = response.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn unavailable(path: &str, err: AppError) -> Response {
    warn!(path, error = %err, "request could not be served");
    (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
}
