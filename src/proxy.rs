//! Pass-through proxy for the user service.
//!
//! Exposes a single internal route, `GET /api/user`, forwarding to
//! `GET {upstream}/user`. The upstream status code and body are forwarded
//! verbatim; an unreachable upstream answers 502.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::{info, warn};

struct ProxyState {
    upstream: String,
    client: reqwest::Client,
}

pub fn router(upstream: impl Into<String>) -> Router {
    let mut upstream = upstream.into();
    while upstream.ends_with('/') {
        upstream.pop();
    }
    let state = Arc::new(ProxyState {
        upstream,
        client: reqwest::Client::new(),
    });
    Router::new()
        .route("/api/user", get(forward_user_list))
        .with_state(state)
}

pub async fn serve(listener: tokio::net::TcpListener, upstream: String) -> anyhow::Result<()> {
    info!(
        "proxy listening on {}, upstream {upstream}",
        listener.local_addr()?
    );
    axum::serve(listener, router(upstream)).await?;
    Ok(())
}

async fn forward_user_list(State(state): State<Arc<ProxyState>>) -> Response {
    let url = format!("{}/user", state.upstream);
    match state.client.get(&url).send().await {
        Ok(upstream_resp) => {
            let status = StatusCode::from_u16(upstream_resp.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = upstream_resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/json")
                .to_string();
            let body = upstream_resp.bytes().await.unwrap_or_default();
            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
        }
        Err(err) => {
            warn!("upstream fetch failed: {err}");
            (StatusCode::BAD_GATEWAY, format!("upstream unreachable: {err}")).into_response()
        }
    }
}
