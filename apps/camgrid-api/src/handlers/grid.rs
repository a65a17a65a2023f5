//! 网格 handlers
//!
//! - POST /grid/rows - 按路径与行区间加载行（服务端行模型的 getRows）
//! - POST /grid/expand, /grid/collapse - 展开/收起分组行
//! - GET /grid/state - 会话状态（分组模式、刷新状态、已加载路径）
//! - PUT /grid/mode - 切换分组模式（整体重建会话）
//! - POST /grid/refresh/{enable,disable,toggle,trigger} - 定时刷新控制

use crate::AppState;
use crate::utils::{
    cycle_to_dto, grid_error, normalize_required, ok_response, parse_grouping_mode,
    refresh_state, state_to_dto,
};
use api_contract::{GridNodeRequest, GridRowsRequest, GridRowsResponse, GroupingModeRequest};
use axum::{Json, extract::State, response::Response};
use tracing::info;

/// 加载行
pub async fn grid_rows(State(state): State<AppState>, Json(req): Json<GridRowsRequest>) -> Response {
    let session = state.session();
    match session
        .load_rows(&req.route, req.start_row, req.end_row, &req.status_filter)
        .await
    {
        Ok(block) => ok_response(GridRowsResponse {
            row_data: block.row_data,
            row_count: block.row_count,
        }),
        Err(err) => grid_error(err),
    }
}

/// 展开分组
pub async fn grid_expand(
    State(state): State<AppState>,
    Json(req): Json<GridNodeRequest>,
) -> Response {
    let id = match normalize_required(req.id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let session = state.session();
    session.expand(&req.route, &id);
    ok_response(state_to_dto(&session))
}

/// 收起分组
pub async fn grid_collapse(
    State(state): State<AppState>,
    Json(req): Json<GridNodeRequest>,
) -> Response {
    let id = match normalize_required(req.id, "id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let session = state.session();
    session.collapse(&req.route, &id);
    ok_response(state_to_dto(&session))
}

/// 会话状态
pub async fn grid_state(State(state): State<AppState>) -> Response {
    ok_response(state_to_dto(&state.session()))
}

/// 切换分组模式：旧会话销毁，缓存与视图重新开始
pub async fn set_grouping_mode(
    State(state): State<AppState>,
    Json(req): Json<GroupingModeRequest>,
) -> Response {
    let mode = match parse_grouping_mode(req.mode) {
        Ok(mode) => mode,
        Err(response) => return response,
    };
    let session = state.replace_session(mode);
    info!(target: "camgrid.api", mode = %mode, "grouping_mode_changed");
    ok_response(state_to_dto(&session))
}

pub async fn enable_refresh(State(state): State<AppState>) -> Response {
    let session = state.session();
    session.enable_refresh();
    ok_response(refresh_state(&session))
}

pub async fn disable_refresh(State(state): State<AppState>) -> Response {
    let session = state.session();
    session.disable_refresh();
    ok_response(refresh_state(&session))
}

pub async fn toggle_refresh(State(state): State<AppState>) -> Response {
    let session = state.session();
    session.toggle_refresh();
    ok_response(refresh_state(&session))
}

/// 立即执行一次刷新周期（未启用时跳过）
pub async fn trigger_refresh(State(state): State<AppState>) -> Response {
    let session = state.session();
    ok_response(cycle_to_dto(session.refresh_now().await))
}
