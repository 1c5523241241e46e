use crate::{
    config::Config,
    errors::{into_response, AppError},
    loader::{load_local_resource, FileReader, ResourceResponse},
    security,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use url::Url;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub roots: Arc<Vec<Url>>,
    pub extension_location: Option<Url>,
    pub reader: Arc<dyn FileReader>,
}

pub async fn serve(cfg: Config, reader: Arc<dyn FileReader>) -> anyhow::Result<()> {
    let roots = cfg.root_uris()?;
    let extension_location = cfg.extension_location();
    let shared = AppState {
        cfg: Arc::new(cfg),
        roots: Arc::new(roots),
        extension_location,
        reader,
    };

    let app = build_router(shared.clone());

    let addr: std::net::SocketAddr =
        format!("{}:{}", shared.cfg.server.bind_addr, shared.cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(shared: AppState) -> Router {
    let base = shared.cfg.server.base_path.clone();
    Router::new()
        .route("/healthz", get(health))
        .route(&format!("{base}/resource"), get(resource))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok"})))
}

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub uri: String,
}

async fn resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ResourceQuery>,
) -> Response {
    use std::time::Instant;
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let origin = headers
        .get("Origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if let Err(e) = security::check_origin(&headers, &state.cfg.auth.allowed_origins) {
        audit(&request_id, &origin, &params.uri, "deny", e.code(), &started, 0);
        return into_response(e).into_response();
    }

    let request = match Url::parse(&params.uri) {
        Ok(u) => u,
        Err(e) => {
            let err = AppError::BadRequest(format!("invalid uri: {e}"));
            audit(&request_id, &origin, &params.uri, "deny", err.code(), &started, 0);
            return into_response(err).into_response();
        }
    };

    let response = load_local_resource(
        &request,
        state.reader.as_ref(),
        state.extension_location.as_ref(),
        &state.roots,
    )
    .await;

    match response {
        ResourceResponse::Success { data, mime_type } => {
            audit(&request_id, &origin, &params.uri, "allow", "OK", &started, data.len() as u64);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime_type)],
                bytes::Bytes::from(data),
            )
                .into_response()
        }
        ResourceResponse::AccessDenied => {
            let err = AppError::AccessDenied;
            audit(&request_id, &origin, &params.uri, "deny", err.code(), &started, 0);
            into_response(err).into_response()
        }
        ResourceResponse::Failed => {
            let err = AppError::LoadFailed;
            audit(&request_id, &origin, &params.uri, "error", err.code(), &started, 0);
            into_response(err).into_response()
        }
    }
}

fn audit(
    request_id: &str,
    origin: &str,
    uri: &str,
    decision: &str,
    code: &str,
    started: &std::time::Instant,
    bytes_out: u64,
) {
    tracing::info!(
        request_id = request_id,
        origin = origin,
        uri = uri,
        decision = decision,
        code = code,
        duration_ms = started.elapsed().as_millis() as u64,
        bytes_out = bytes_out,
        "audit"
    );
}
