//! HTTP front end: landing page, form submission and JSON errors.

use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header::ACCEPT},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use weather_core::{Config, ErrorKind, LookupError, WeatherProvider, provider_from_config};

use crate::views::{IndexView, MapView};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    pub maps_api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>, maps_api_key: Option<&str>) -> Self {
        Self {
            provider,
            maps_api_key: maps_api_key.map(Arc::from),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(config)?);
        Ok(Self::new(provider, config.maps_api_key()))
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherForm {
    location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Lookup(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "Request failed");
        } else {
            tracing::info!(%status, error = %self, "Request rejected");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// GET / - Landing page
async fn index() -> Result<Html<String>, ApiError> {
    Ok(Html(IndexView.render()?))
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// POST /weather - Look up current weather for the submitted `location`
async fn weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<WeatherForm>, FormRejection>,
) -> Result<Response, ApiError> {
    // An undecodable body is handled the same as an absent field.
    let location = match form {
        Ok(Form(form)) => form.location.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(%rejection, "Could not decode weather form");
            String::new()
        }
    };

    let record = weather_core::lookup(state.provider.as_ref(), &location).await?;

    if wants_json(&headers) {
        return Ok(Json(record).into_response());
    }

    let view = MapView {
        record: &record,
        maps_api_key: state.maps_api_key.as_deref(),
    };
    Ok(Html(view.render()?).into_response())
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/weather", post(weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C
pub async fn run_http_server(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {bind}"))?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down gracefully...");
}
