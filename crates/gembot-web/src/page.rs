//! The embedded single-page chat UI.

use axum::response::Html;
use axum::routing::get;
use axum::Router;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Serve the chat page at `/`, with the model name substituted into the
/// header.
pub(crate) fn page_routes(model: &str) -> Router {
    let page = INDEX_HTML.replace("{{model}}", model);
    Router::new().route(
        "/",
        get(move || {
            let page = page.clone();
            async move { Html(page) }
        }),
    )
}
