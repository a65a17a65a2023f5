//! Handlers 模块

pub mod entities;
pub mod grid;
pub mod stats;

pub use entities::*;
pub use grid::*;
pub use stats::*;

use axum::{Json, response::IntoResponse};

/// 健康检查
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
