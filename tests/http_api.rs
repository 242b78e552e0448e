//! Router tests driven through `tower::ServiceExt::oneshot` with a stub renderer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;
use url::Url;
use website2pdf::server::{build_router, AppState};
use website2pdf::{Error, PdfRenderer, Result};

const FAKE_PDF: &[u8] = b"%PDF-1.7\n%stub\n%%EOF\n";

/// Records every URL it is asked for and answers with a canned result.
struct StubRenderer {
    calls: Mutex<Vec<String>>,
    outcome: fn(&Url) -> Result<Vec<u8>>,
}

impl StubRenderer {
    fn new(outcome: fn(&Url) -> Result<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome,
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for StubRenderer {
    async fn render(&self, url: &Url) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        (self.outcome)(url)
    }
}

fn app(renderer: Arc<StubRenderer>) -> Router {
    build_router(AppState::new(renderer))
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("router should respond")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

fn content_type(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn index_serves_the_form() {
    let response = get(app(StubRenderer::new(|_| Ok(FAKE_PDF.to_vec()))), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    let html = body_text(response).await;
    assert!(html.contains("website2pdf"));
    assert!(html.contains("/api/create-pdf?url="));
}

#[tokio::test]
async fn successful_conversion_streams_pdf() {
    let renderer = StubRenderer::new(|_| Ok(FAKE_PDF.to_vec()));
    let response = get(
        app(renderer.clone()),
        "/api/create-pdf?url=https%3A%2F%2Fwww.example.com%2Fdocs%3Fpage%3D2",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/pdf");
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"www.example.com.pdf\""
    );
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], FAKE_PDF);
    assert_eq!(renderer.calls(), vec!["https://www.example.com/docs?page=2"]);
}

#[tokio::test]
async fn missing_url_is_a_bad_request() {
    for uri in [
        "/api/create-pdf",
        "/api/create-pdf?url=",
        "/api/create-pdf?url=%20",
        "/api/create-pdf?link=https://example.com",
        "/api/create-pdf?url=https://a.test&url=https://b.test",
    ] {
        let renderer = StubRenderer::new(|_| Ok(FAKE_PDF.to_vec()));
        let response = get(app(renderer.clone()), uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(content_type(&response).starts_with("text/plain"));
        assert_eq!(body_text(response).await, "URL is required");
        assert!(renderer.calls().is_empty(), "{uri} reached the renderer");
    }
}

#[tokio::test]
async fn malformed_url_never_reaches_the_browser() {
    for uri in [
        "/api/create-pdf?url=example.com",
        "/api/create-pdf?url=file%3A%2F%2F%2Fetc%2Fpasswd",
    ] {
        let renderer = StubRenderer::new(|_| Ok(FAKE_PDF.to_vec()));
        let response = get(app(renderer.clone()), uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, "Invalid URL or website not found.");
        assert!(renderer.calls().is_empty());
    }
}

#[tokio::test]
async fn unresolved_host_is_a_bad_request() {
    let renderer = StubRenderer::new(|url| {
        Err(Error::HostNotFound(format!(
            "{} (Navigate failed: net::ERR_NAME_NOT_RESOLVED)",
            url
        )))
    });
    let response = get(app(renderer), "/api/create-pdf?url=https://nope.invalid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid URL or website not found.");
}

#[tokio::test]
async fn browser_failures_are_server_errors() {
    let renderer = StubRenderer::new(|_| Err(Error::RenderError("PDF export failed: boom".into())));
    let response = get(app(renderer), "/api/create-pdf?url=https://example.com").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type(&response).starts_with("text/plain"));
    assert_eq!(
        body_text(response).await,
        "Failed to generate PDF. Rendering failed: PDF export failed: boom"
    );
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let response = get(app(StubRenderer::new(|_| Ok(Vec::new()))), "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
