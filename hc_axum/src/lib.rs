use std::iter::once;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderValue, Request, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::TraceLayer,
};

/// Serves an Axum router on `addr` until Ctrl+C or SIGTERM is received.
///
/// # Errors
///
/// Returns an error if the listener cannot bind to `addr` or the server
/// fails while running.
pub async fn run_app(
    app: Router,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Builds the CORS layer from a comma-separated allow-list.
///
/// `*` allows any origin. Anything else is parsed as a list of exact
/// origins; blank entries are ignored.
///
/// # Errors
///
/// Returns an error if an origin is not a valid header value.
pub fn cors_layer(
    allowed_origins: &str,
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<HeaderValue>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(origins))
}

/// Wraps a router with the layers shared by every service: CORS, request
/// ids, sensitive header redaction, request tracing and compression. Unknown
/// routes answer with a JSON 404.
pub fn with_common_layers(app: Router, cors: CorsLayer) -> Router {
    let trace_layer = TraceLayer::new_for_http().on_request(
        |request: &Request<Body>, _: &tracing::Span| {
            tracing::info!(
                "received request: {method} {uri}",
                method = request.method(),
                uri = request.uri()
            );
        },
    );

    let compression_layer = CompressionLayer::new().gzip(true).deflate(true);

    app.fallback(not_found)
        .layer(cors)
        // keep `Authorization` out of the logs
        .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
        .layer(trace_layer)
        .layer(compression_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "detail": "not found",
        })),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::warn!("signal received, starting graceful shutdown");
}
