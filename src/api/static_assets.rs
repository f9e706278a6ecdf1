//! Embedded widget assets.
//!
//! In release mode the files are embedded into the binary at compile time;
//! in debug mode rust-embed reads them from `assets/widget/` at runtime.

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/widget/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
struct WidgetAssets;

const WIDGET_INDEX: &str = "index.html";

fn asset_response(path: &str, cache_control: &'static str) -> Response {
    match WidgetAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache_control.to_string()),
                ],
                content.data,
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the widget page the MCP resource is built from.
pub async fn serve_widget() -> Response {
    // Never cached, so widget updates reach clients on the next read.
    asset_response(WIDGET_INDEX, "no-cache")
}

/// Serve a file referenced by the widget page.
pub async fn serve_widget_asset(Path(file): Path<String>) -> Response {
    asset_response(file.trim_start_matches('/'), "public, max-age=3600")
}

/// Raw widget HTML, when embedded.
pub fn widget_html() -> Option<String> {
    WidgetAssets::get(WIDGET_INDEX).map(|file| String::from_utf8_lossy(&file.data).into_owned())
}
