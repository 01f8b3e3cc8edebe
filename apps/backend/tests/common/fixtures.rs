//! Test fixtures and factory functions for creating test data.

use serde_json::json;

const FAKE_PREFIX: &str = "%PDF-fake pages=";

/// Build a synthetic document the fake renderer reads as `pages` pages.
pub fn fake_pdf(pages: usize) -> Vec<u8> {
    format!("{}{}", FAKE_PREFIX, pages).into_bytes()
}

/// A document with a PDF header but nothing the renderer can read.
pub fn broken_pdf() -> Vec<u8> {
    b"%PDF-1.7\n%%garbage".to_vec()
}

/// Bytes that are not a PDF at all.
pub fn not_a_pdf() -> Vec<u8> {
    b"PK\x03\x04 this is a zip archive".to_vec()
}

/// Page count of a synthetic document, if it is one.
pub fn parse_fake_pdf(bytes: &[u8]) -> Option<usize> {
    std::str::from_utf8(bytes)
        .ok()?
        .strip_prefix(FAKE_PREFIX)?
        .trim()
        .parse()
        .ok()
}

/// Create a reveal request body.
pub fn reveal_request(reveal: bool) -> serde_json::Value {
    json!({ "reveal": reveal })
}

/// Create an update settings request body with only the given fields.
pub fn update_settings_request(
    dpi: Option<u32>,
    show_page_number: Option<bool>,
    keep_answer_visible: Option<bool>,
    no_repeat: Option<bool>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(d) = dpi {
        obj.insert("dpi".to_string(), json!(d));
    }
    if let Some(s) = show_page_number {
        obj.insert("show_page_number".to_string(), json!(s));
    }
    if let Some(k) = keep_answer_visible {
        obj.insert("keep_answer_visible".to_string(), json!(k));
    }
    if let Some(n) = no_repeat {
        obj.insert("no_repeat".to_string(), json!(n));
    }
    serde_json::Value::Object(obj)
}

/// Current page index from a deck view body.
pub fn current_page(view: &serde_json::Value) -> usize {
    view["current_page"].as_u64().expect("current_page set") as usize
}
