//! HTTP API for pdm-web
//!
//! One module per route group; `build_router` merges them.

pub mod dashboard;
pub mod health;
pub mod predict;
pub mod ui;
pub mod upload;

pub use dashboard::dashboard_routes;
pub use health::health_routes;
pub use predict::predict_routes;
pub use ui::ui_routes;
pub use upload::upload_routes;
