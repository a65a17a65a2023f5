//! 路由定义
//!
//! 集中管理 `/api` 下的路由：
//! - 分页拉取：/locations, /bridges, /cameras（及 /{kind}/:id）
//! - 状态变更：/bridges/:id/status, /cameras/:id/status
//! - 统计：/stats
//! - 网格：/grid/rows, /grid/expand, /grid/collapse, /grid/state, /grid/mode
//! - 刷新控制：/grid/refresh/{enable,disable,toggle,trigger}

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post, put},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/locations/:id", get(get_location))
        .route("/bridges", get(list_bridges))
        .route("/bridges/:id", get(get_bridge))
        .route("/bridges/:id/status", put(update_bridge_status))
        .route("/cameras", get(list_cameras))
        .route("/cameras/:id", get(get_camera))
        .route("/cameras/:id/status", put(update_camera_status))
        .route("/stats", get(get_stats))
        .route("/grid/rows", post(grid_rows))
        .route("/grid/expand", post(grid_expand))
        .route("/grid/collapse", post(grid_collapse))
        .route("/grid/state", get(grid_state))
        .route("/grid/mode", put(set_grouping_mode))
        .route("/grid/refresh/enable", post(enable_refresh))
        .route("/grid/refresh/disable", post(disable_refresh))
        .route("/grid/refresh/toggle", post(toggle_refresh))
        .route("/grid/refresh/trigger", post(trigger_refresh))
}
