use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::cleanup::CleanupClient;
use crate::ocr::TesseractOcr;
use crate::parse::AadhaarRecord;
use crate::settings::Settings;

use super::extract::{extract_request, read_extract_form};
use super::models::ErrorResponse;
use super::state::ServerState;

pub async fn run_server(settings: Settings, addr: String) -> Result<()> {
    let max_upload_bytes = settings.max_upload_bytes;
    let state = Arc::new(ServerState {
        engine: TesseractOcr::new(&settings),
        cleanup: CleanupClient::new(&settings)?,
        settings,
    });
    let app = Router::new()
        .route("/health", get(health))
        .route("/ocr/extract", post(extract))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(axum::middleware::from_fn(cors_middleware));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| "failed to bind server address")?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "ok": true, "message": "Server is good in health" })),
    )
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
}

async fn extract(
    State(state): State<Arc<ServerState>>,
    multipart: Multipart,
) -> Result<Json<AadhaarRecord>, (StatusCode, Json<ErrorResponse>)> {
    let result = match read_extract_form(multipart).await {
        Ok(form) => extract_request(state, form).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(record) => Ok(Json(record)),
        Err(err) => Err((err.status, Json(ErrorResponse { error: err.message }))),
    }
}
