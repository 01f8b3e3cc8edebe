//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the real router to a fake page renderer
//! - Session helpers
//! - Upload helpers
//!
//! The fake renderer understands the documents built by
//! [`fixtures::fake_pdf`], so these tests run without libpdfium.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::HeaderName;
use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use image::{DynamicImage, Rgb, RgbImage};

use split_deck_backend::config::Config;
use split_deck_backend::services::render::{encode_halves, PageHalves, PageRenderer, RenderError};
use split_deck_backend::{app, AppState};

/// Renderer for synthetic documents of the form `%PDF-fake pages=N`.
///
/// Page images are `dpi / 10 * 2` pixels wide and `dpi / 10` high so tests
/// can observe the requested resolution.
#[derive(Default)]
pub struct FakeRenderer {
    pub page_count_calls: AtomicUsize,
    pub render_calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn renders(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }
}

impl PageRenderer for FakeRenderer {
    fn page_count(&self, document: &[u8]) -> Result<usize, RenderError> {
        self.page_count_calls.fetch_add(1, Ordering::SeqCst);
        fixtures::parse_fake_pdf(document)
            .ok_or_else(|| RenderError::InvalidDocument("unreadable xref table".to_string()))
    }

    fn render_halves(
        &self,
        document: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<PageHalves, RenderError> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        let total = fixtures::parse_fake_pdf(document)
            .ok_or_else(|| RenderError::InvalidDocument("unreadable xref table".to_string()))?;
        if page_index >= total {
            return Err(RenderError::IndexOutOfRange {
                index: page_index,
                total,
            });
        }

        let height = (dpi / 10).max(1);
        let width = height * 2;
        let shade = (page_index % 256) as u8;
        let page = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([shade, 0, 0])
            } else {
                Rgb([0, 0, shade])
            }
        });
        encode_halves(&DynamicImage::ImageRgb8(page))
    }
}

/// Test context wiring the application router to a [`FakeRenderer`].
pub struct TestContext {
    pub renderer: Arc<FakeRenderer>,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a new test context with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new test context with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let renderer = Arc::new(FakeRenderer::default());
        let state = AppState::new(config, renderer.clone());
        Self {
            renderer,
            app: app(state.clone()),
            state,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Test server over the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Session header name.
    pub fn session_header() -> HeaderName {
        HeaderName::from_static("x-session-id")
    }

    /// Create a session and return its id.
    pub async fn create_session(server: &TestServer) -> String {
        let response = server.post("/api/session").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["session_id"].as_str().unwrap().to_string()
    }

    /// Upload `bytes` as `file_name` into the session.
    pub async fn upload(
        server: &TestServer,
        session: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> TestResponse {
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(bytes)
                .file_name(file_name)
                .mime_type("application/pdf"),
        );

        server
            .post("/api/document")
            .add_header(Self::session_header(), session.to_string())
            .multipart(form)
            .await
    }

    /// Create a session holding a fake document of `pages` pages.
    pub async fn session_with_deck(server: &TestServer, pages: usize) -> (String, serde_json::Value) {
        let session = Self::create_session(server).await;
        let response = Self::upload(server, &session, "deck.pdf", fixtures::fake_pdf(pages)).await;
        response.assert_status_ok();
        (session, response.json())
    }

    /// POST with the session header and no body.
    pub async fn post(server: &TestServer, session: &str, path: &str) -> TestResponse {
        server
            .post(path)
            .add_header(Self::session_header(), session.to_string())
            .await
    }

    /// GET with the session header.
    pub async fn get(server: &TestServer, session: &str, path: &str) -> TestResponse {
        server
            .get(path)
            .add_header(Self::session_header(), session.to_string())
            .await
    }
}
