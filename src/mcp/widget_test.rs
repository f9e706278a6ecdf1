//! Tests for the widget resource

use axum::{Router, routing::get};
use rmcp::model::{ErrorCode, ResourceContents};

use crate::api::widget_html;
use crate::mcp::widget::{TodoWidget, WIDGET_MIME_TYPE, WIDGET_PATH, WIDGET_URI};

/// Serve `html` at the widget path on an ephemeral port.
async fn serve_widget(html: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(WIDGET_PATH, get(move || async move { html }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[test]
fn test_origin_strips_path() {
    let widget = TodoWidget::new("https://todos.example.com/app/");
    assert_eq!(widget.base_url(), "https://todos.example.com/app");
    assert_eq!(widget.origin(), "https://todos.example.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_fetches_from_base_url() {
    let base_url = serve_widget("<html>deployed widget</html>").await;
    let widget = TodoWidget::new(base_url);

    let contents = widget.read(WIDGET_URI).await.unwrap();

    match contents {
        ResourceContents::TextResourceContents {
            uri,
            mime_type,
            text,
            meta,
        } => {
            assert_eq!(uri, WIDGET_URI);
            assert_eq!(mime_type.as_deref(), Some(WIDGET_MIME_TYPE));
            assert_eq!(text, "<html>deployed widget</html>");
            assert!(meta.is_some());
        }
        _ => panic!("Expected text resource contents"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_falls_back_to_embedded_html() {
    let widget = TodoWidget::new(closed_base_url().await);

    let html = widget.html().await.unwrap();

    assert_eq!(Some(html), widget_html());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_unknown_uri_is_not_found() {
    let widget = TodoWidget::new("http://localhost:3000");

    let err = widget.read("ui://widget/other.html").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
}
