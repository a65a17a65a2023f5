//! HTTP 响应辅助函数和 DTO 转换
//!
//! 错误响应与错误码对应关系：
//! - INVALID.REQUEST（400）：请求参数非法
//! - INVALID.CURSOR（400）：分页游标无法解码或与过滤条件不匹配
//! - RESOURCE.NOT_FOUND（404）
//! - GRID.LOAD_FAILED（502）：网格行加载时后端拉取失败
//! - INTERNAL.ERROR（500）

use api_contract::{
    ApiResponse, CycleReportDto, GridStateDto, MetricsDto, MutationResultDto, PageDto,
    RefreshStateDto, RouteStateDto, StatsDto, StatusCountsDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use camgrid_grid::{CycleOutcome, GridError, GridSession};
use camgrid_pagination::Page;
use camgrid_storage::{FetchError, MutationResult, StatusCounts, StorageError, StoreStats};
use camgrid_telemetry::MetricsSnapshot;
use serde::Serialize;

/// 成功响应
pub fn ok_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 分页拉取错误响应
pub fn fetch_error(err: FetchError) -> Response {
    let message = err.to_string();
    match err {
        FetchError::InvalidCursor(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error("INVALID.CURSOR", message)),
        )
            .into_response(),
        FetchError::Backend(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
        )
            .into_response(),
    }
}

/// 网格加载错误响应
pub fn grid_error(err: GridError) -> Response {
    let message = err.to_string();
    let (status, code) = match err {
        GridError::UnsupportedDepth { .. } => (StatusCode::BAD_REQUEST, "INVALID.REQUEST"),
        GridError::InvalidCursor(_) => (StatusCode::BAD_GATEWAY, "GRID.LOAD_FAILED"),
        GridError::FetchFailure(_) => (StatusCode::BAD_GATEWAY, "GRID.LOAD_FAILED"),
    };
    (status, Json(ApiResponse::<()>::error(code, message))).into_response()
}

/// Page 转 PageDto
pub fn page_to_dto<T>(page: Page<T>) -> PageDto<T> {
    PageDto {
        results: page.results,
        next_page_token: page.next_cursor,
        prev_page_token: page.prev_cursor,
        total_size: page.total_size,
    }
}

/// MutationResult 转 MutationResultDto
pub fn mutation_to_dto(result: MutationResult) -> MutationResultDto {
    MutationResultDto {
        success: result.success,
        message: result.message,
    }
}

fn counts_to_dto(counts: StatusCounts) -> StatusCountsDto {
    StatusCountsDto {
        online: counts.online,
        offline: counts.offline,
        error: counts.error,
        total: counts.total(),
    }
}

/// MetricsSnapshot 转 MetricsDto
pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsDto {
    let avg_fetch_latency_ms = (snapshot.fetch_latency_ms_count > 0)
        .then(|| snapshot.fetch_latency_ms_total / snapshot.fetch_latency_ms_count);
    MetricsDto {
        pages_fetched: snapshot.pages_fetched,
        fetch_failures: snapshot.fetch_failures,
        avg_fetch_latency_ms,
        cursor_restart: snapshot.cursor_restart,
        cursor_forward: snapshot.cursor_forward,
        cursor_backward: snapshot.cursor_backward,
        cursor_repeat: snapshot.cursor_repeat,
        cursor_synthesized: snapshot.cursor_synthesized,
        rows_served: snapshot.rows_served,
        reconcile_cycles: snapshot.reconcile_cycles,
        reconcile_skipped: snapshot.reconcile_skipped,
        reconcile_failed: snapshot.reconcile_failed,
        patches_applied: snapshot.patches_applied,
    }
}

/// StoreStats + 指标快照 转 StatsDto
pub fn stats_to_dto(stats: StoreStats, snapshot: MetricsSnapshot) -> StatsDto {
    StatsDto {
        locations: stats.locations,
        bridges: counts_to_dto(stats.bridges),
        cameras: counts_to_dto(stats.cameras),
        metrics: metrics_to_dto(snapshot),
    }
}

/// 会话刷新状态
pub fn refresh_state(session: &GridSession) -> RefreshStateDto {
    let reconciler = session.reconciler();
    RefreshStateDto {
        enabled: reconciler.is_enabled(),
        torn_down: reconciler.is_torn_down(),
        interval_seconds: reconciler.interval().as_secs(),
    }
}

/// CycleOutcome 转 CycleReportDto
pub fn cycle_to_dto(outcome: CycleOutcome) -> CycleReportDto {
    match outcome {
        CycleOutcome::Completed(report) => CycleReportDto {
            outcome: "completed".to_string(),
            reason: None,
            visible: report.visible,
            fetches: report.fetches,
            patches: report.patches,
            rows_updated: report.rows_updated,
        },
        CycleOutcome::Skipped(reason) => CycleReportDto {
            outcome: "skipped".to_string(),
            reason: Some(reason.as_str().to_string()),
            visible: 0,
            fetches: 0,
            patches: 0,
            rows_updated: 0,
        },
        CycleOutcome::Failed(message) => CycleReportDto {
            outcome: "failed".to_string(),
            reason: Some(message),
            visible: 0,
            fetches: 0,
            patches: 0,
            rows_updated: 0,
        },
    }
}

/// 会话 + 视图快照 转 GridStateDto
pub fn state_to_dto(session: &GridSession) -> GridStateDto {
    let snapshot = session.view().snapshot();
    GridStateDto {
        mode: session.mode().to_string(),
        refresh: refresh_state(session),
        scroll_top: snapshot.scroll_top,
        expanded: snapshot.expanded.into_iter().collect(),
        routes: snapshot
            .routes
            .into_iter()
            .map(|(route, data)| RouteStateDto {
                route,
                rows: data.rows,
                row_count: data.row_count,
                load_failed: data.load_failed,
            })
            .collect(),
    }
}
