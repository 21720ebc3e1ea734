//! Embedded static assets
//!
//! The chat page ships inside the binary. In development, files under `ui/`
//! on disk take over when the embedded copy is missing.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "ui"]
struct Assets;

const UI_DIR: &str = "ui";

fn asset_response(path: &str, data: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ([(header::CONTENT_TYPE, mime.as_ref().to_string())], Body::from(data)).into_response()
}

/// Serve a file from `/assets/*path`
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    if path.split('/').any(|segment| segment == "..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    if let Some(content) = Assets::get(path) {
        return asset_response(path, content.data.into_owned());
    }

    let fs_path = PathBuf::from(UI_DIR).join(path);
    match tokio::fs::read(&fs_path).await {
        Ok(content) => asset_response(path, content),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Get the index.html content (embedded or from filesystem)
pub fn get_index_html() -> Option<String> {
    if let Some(content) = Assets::get("index.html") {
        return String::from_utf8(content.data.into_owned()).ok();
    }

    std::fs::read_to_string(PathBuf::from(UI_DIR).join("index.html")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_embedded() {
        let html = get_index_html().unwrap();
        assert!(html.contains("<html"));
    }

    #[test]
    fn test_summary_panel_follows_history_not_end() {
        let html = get_index_html().unwrap();
        for id in ["id=\"summary\"", "id=\"total-messages\"", "id=\"user-messages\"", "id=\"report\""] {
            assert!(html.contains(id), "index.html is missing {id}");
        }

        let script = String::from_utf8(Assets::get("app.js").unwrap().data.into_owned()).unwrap();
        assert!(script.contains("els.summary.hidden = thread.messages.length === 0"));
        assert!(!script.contains("hidden = !thread.ended"));
    }

    #[test]
    fn test_reset_failure_is_reported() {
        let script = String::from_utf8(Assets::get("app.js").unwrap().data.into_owned()).unwrap();
        let (_, reset_handler) = script.split_once("els.reset.addEventListener").unwrap();
        assert!(reset_handler.contains("catch (err)"));
        assert!(reset_handler.contains("showError(err)"));
    }

    #[tokio::test]
    async fn test_parent_segments_rejected() {
        let response = serve_static(Path("../Cargo.toml".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serves_stylesheet_with_mime() {
        let response = serve_static(Path("app.css".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );
    }
}
