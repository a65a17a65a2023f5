//! 分页拉取服务 handlers
//!
//! - GET /locations, /bridges, /cameras - 分页列出（locationId / bridgeId / statusIn / idIn / pageToken / pageSize）
//! - GET /{kind}/{id} - 获取单个实体
//! - PUT /bridges/{id}/status, /cameras/{id}/status - 变更状态
//!
//! 列表接口走 `PageFetcher`，与网格使用同一份分页契约。

use crate::AppState;
use crate::utils::{
    bad_request_error, fetch_error, mutation_to_dto, not_found_error, ok_response,
    page_to_dto, parse_status, storage_error,
};
use api_contract::{PageQuery, StatusUpdateRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use camgrid_storage::PageRequest;
use domain::EntityKind;
use tracing::info;

#[derive(serde::Deserialize)]
pub struct EntityPath {
    id: String,
}

async fn list_page(state: &AppState, kind: EntityKind, query: PageQuery) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(err) => return bad_request_error(err.to_string()),
    };
    let page_size = query
        .page_size
        .filter(|size| *size > 0)
        .unwrap_or(state.default_page_size);
    let request = PageRequest::new(kind, filter, page_size).with_cursor(query.page_token);
    match state.fetcher.fetch_page(request).await {
        Ok(page) => ok_response(page_to_dto(page)),
        Err(err) => fetch_error(err),
    }
}

async fn find_one(state: &AppState, kind: EntityKind, id: &str) -> Response {
    match state.store.find_entity(kind, id).await {
        Ok(Some(entity)) => ok_response(entity),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

async fn update_status(
    state: &AppState,
    kind: EntityKind,
    id: &str,
    req: StatusUpdateRequest,
) -> Response {
    let status = match parse_status(req.status) {
        Ok(status) => status,
        Err(response) => return response,
    };
    match state.store.update_status(kind, id, status).await {
        Ok(result) => {
            info!(
                target: "camgrid.api",
                kind = %kind,
                id = %id,
                status = %status,
                success = result.success,
                "status_update_requested"
            );
            ok_response(mutation_to_dto(result))
        }
        Err(err) => storage_error(err),
    }
}

/// 列出 Location
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    list_page(&state, EntityKind::Location, query).await
}

/// 列出 Bridge
pub async fn list_bridges(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    list_page(&state, EntityKind::Bridge, query).await
}

/// 列出 Camera
pub async fn list_cameras(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    list_page(&state, EntityKind::Camera, query).await
}

pub async fn get_location(State(state): State<AppState>, Path(path): Path<EntityPath>) -> Response {
    find_one(&state, EntityKind::Location, &path.id).await
}

pub async fn get_bridge(State(state): State<AppState>, Path(path): Path<EntityPath>) -> Response {
    find_one(&state, EntityKind::Bridge, &path.id).await
}

pub async fn get_camera(State(state): State<AppState>, Path(path): Path<EntityPath>) -> Response {
    find_one(&state, EntityKind::Camera, &path.id).await
}

/// 变更 Bridge 状态；目标不存在时返回 success=false
pub async fn update_bridge_status(
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    Json(req): Json<StatusUpdateRequest>,
) -> Response {
    update_status(&state, EntityKind::Bridge, &path.id, req).await
}

/// 变更 Camera 状态；目标不存在时返回 success=false
pub async fn update_camera_status(
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    Json(req): Json<StatusUpdateRequest>,
) -> Response {
    update_status(&state, EntityKind::Camera, &path.id, req).await
}
