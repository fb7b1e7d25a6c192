//! UI routes - HTML pages without their own logic

use axum::{response::Html, routing::get, Router};

use crate::AppState;

pub mod pages;

/// GET /
///
/// Landing page with the single-record form
pub async fn root_page() -> Html<String> {
    Html(pages::index_page(None))
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}
