//! HTTP routes: `/json`, `/text`, and `/health`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use spritsit_core::{CleanDocument, JsonConfig, Spritsit, SpritsitError, convert_to_json, convert_to_text, is_valid_callback};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use url::Url;

use crate::auth::{TokenError, validate_token};
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub spritsit: Arc<Spritsit>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(spritsit: Spritsit, config: ServerConfig) -> Self {
        Self { spritsit: Arc::new(spritsit), config: Arc::new(config) }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadParams {
    pub url: Option<String>,
    pub token: Option<String>,
    pub callback: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Forbidden(TokenError),
    MissingUrl,
    InvalidUrl(String),
    InvalidCallback,
    Pipeline(SpritsitError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Forbidden(err) => (StatusCode::FORBIDDEN, format!("invalid token: {err}")),
            ApiError::MissingUrl => (StatusCode::BAD_REQUEST, "missing url parameter".to_string()),
            ApiError::InvalidUrl(reason) => (StatusCode::BAD_REQUEST, format!("invalid url: {reason}")),
            ApiError::InvalidCallback => (StatusCode::BAD_REQUEST, "invalid callback parameter".to_string()),
            ApiError::Pipeline(err @ SpritsitError::UnsupportedContentType { .. }) => {
                (StatusCode::NOT_IMPLEMENTED, err.to_string())
            }
            ApiError::Pipeline(err @ SpritsitError::InvalidUrl(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Pipeline(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };
        (status, message).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/json", get(json))
        .route("/text", get(text))
        .route("/health", get(health))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Applies the `url` parameter defaults: required, and `http://` when no scheme is given.
pub fn request_url(raw: Option<&str>) -> Result<String, ApiError> {
    let raw = raw.map(str::trim).filter(|u| !u.is_empty()).ok_or(ApiError::MissingUrl)?;
    let url = if raw.starts_with("http") { raw.to_string() } else { format!("http://{raw}") };

    Url::parse(&url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
    Ok(url)
}

async fn read_document(state: &AppState, params: &ReadParams) -> Result<CleanDocument, ApiError> {
    validate_token(params.token.as_deref(), &state.config.read_api_token, state.config.token_max_age).map_err(
        |err| {
            warn!("Invalid token, sending 403: {err}");
            ApiError::Forbidden(err)
        },
    )?;

    let url = request_url(params.url.as_deref()).inspect_err(|_| warn!("Request without a usable url"))?;

    state.spritsit.extract(&url).await.map_err(|err| {
        warn!(url = %url, "Extraction failed: {err}");
        ApiError::Pipeline(err)
    })
}

async fn json(State(state): State<AppState>, Query(params): Query<ReadParams>) -> Result<Response, ApiError> {
    if params.callback.as_deref().is_some_and(|cb| !is_valid_callback(cb)) {
        return Err(ApiError::InvalidCallback);
    }

    let doc = read_document(&state, &params).await?;
    let config = JsonConfig { pretty: false, callback: params.callback.clone() };
    let body = convert_to_json(&doc, &config).map_err(ApiError::Pipeline)?;

    let mut response = ([(header::CONTENT_TYPE, "application/json; charset=utf-8")], body).into_response();
    if params.callback.is_some() {
        info!("JSONP is enabled");
        response.headers_mut().insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    Ok(response)
}

async fn text(State(state): State<AppState>, Query(params): Query<ReadParams>) -> Result<Response, ApiError> {
    let doc = read_document(&state, &params).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], convert_to_text(&doc)).into_response())
}

async fn health() -> &'static str {
    "ok"
}
