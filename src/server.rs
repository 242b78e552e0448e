//! HTTP surface: the upload form and the conversion endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{error, info, warn};
use url::form_urlencoded;

use crate::convert::{self, PdfRenderer};
use crate::{Error, Result};

const INDEX_HTML: &str = include_str!("index.html");
const INVALID_TARGET_MESSAGE: &str = "Invalid URL or website not found.";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    renderer: Arc<dyn PdfRenderer>,
}

impl AppState {
    pub fn new(renderer: Arc<dyn PdfRenderer>) -> Self {
        Self { renderer }
    }
}

/// A failed request: status plus the plain-text message shown to the client.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        let (status, message) = match &err {
            Error::MissingUrl => (StatusCode::BAD_REQUEST, err.to_string()),
            e if e.is_invalid_target() => (StatusCode::BAD_REQUEST, INVALID_TARGET_MESSAGE.to_string()),
            e => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate PDF. {}", e),
            ),
        };
        Self { status, message }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/create-pdf", get(create_pdf))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn create_pdf(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> std::result::Result<Response, HttpError> {
    let raw = single_url_param(query.as_deref());
    let url = convert::validate_url(raw.as_deref()).inspect_err(|e| {
        warn!("Rejected conversion request: {}", e);
    })?;

    info!("Generating PDF for {}", url);
    let pdf = state.renderer.render(&url).await.map_err(|e| {
        if e.is_invalid_target() {
            warn!("Error generating PDF for {}: {}", url, e);
        } else {
            error!("Error generating PDF for {}: {}", url, e);
        }
        HttpError::from(e)
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, convert::content_disposition(&url)),
        ],
        pdf,
    )
        .into_response())
}

/// The `url` query value, when it is given exactly once.
fn single_url_param(query: Option<&str>) -> Option<String> {
    let mut values = form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned());

    match (values.next(), values.next()) {
        (Some(value), None) => Some(value),
        _ => None,
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::InitializationError(format!("Failed to bind {}: {}", addr, e)))?;

    let local = listener.local_addr().unwrap_or(addr);
    info!("Listening on http://{}", local);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Other(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
