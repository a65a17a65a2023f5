//! 稳定的 DTO 与 API 响应契约。

use domain::{DomainError, EntityFilter, EntityStatus, HierarchyPath, RowRecord};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 分页列表查询参数。
///
/// `statusIn` / `idIn` 为逗号分隔列表。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub location_id: Option<String>,
    pub bridge_id: Option<String>,
    pub status_in: Option<String>,
    pub id_in: Option<String>,
    pub page_token: Option<String>,
    pub page_size: Option<usize>,
}

impl PageQuery {
    /// 转换为过滤条件；空字符串视为未提供。
    pub fn filter(&self) -> Result<EntityFilter, DomainError> {
        let mut filter = EntityFilter::new();
        if let Some(location_id) = non_empty(&self.location_id) {
            filter = filter.with_location(location_id);
        }
        if let Some(bridge_id) = non_empty(&self.bridge_id) {
            filter = filter.with_bridge(bridge_id);
        }
        if let Some(value) = non_empty(&self.status_in) {
            let statuses = split_list(value)
                .map(|item| item.parse::<EntityStatus>())
                .collect::<Result<Vec<_>, _>>()?;
            filter = filter.with_status_in(statuses);
        }
        if let Some(value) = non_empty(&self.id_in) {
            filter = filter.with_id_in(split_list(value));
        }
        Ok(filter)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// 分页列表响应。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub results: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page_token: Option<String>,
    pub total_size: usize,
}

/// 状态变更请求体。
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// 状态变更结果。
#[derive(Debug, Serialize)]
pub struct MutationResultDto {
    pub success: bool,
    pub message: Option<String>,
}

/// 各状态计数。
#[derive(Debug, Serialize)]
pub struct StatusCountsDto {
    pub online: usize,
    pub offline: usize,
    pub error: usize,
    pub total: usize,
}

/// 进程内计数指标。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub avg_fetch_latency_ms: Option<u64>,
    pub cursor_restart: u64,
    pub cursor_forward: u64,
    pub cursor_backward: u64,
    pub cursor_repeat: u64,
    pub cursor_synthesized: u64,
    pub rows_served: u64,
    pub reconcile_cycles: u64,
    pub reconcile_skipped: u64,
    pub reconcile_failed: u64,
    pub patches_applied: u64,
}

/// 统计响应。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub locations: usize,
    pub bridges: StatusCountsDto,
    pub cameras: StatusCountsDto,
    pub metrics: MetricsDto,
}

/// 网格行请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRowsRequest {
    #[serde(default)]
    pub route: HierarchyPath,
    pub start_row: usize,
    pub end_row: usize,
    #[serde(default)]
    pub status_filter: Vec<EntityStatus>,
}

/// 网格行响应。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRowsResponse {
    pub row_data: Vec<RowRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
}

/// 展开/收起分组请求体：`route` 为分组行所在路径，`id` 为分组行 id。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridNodeRequest {
    #[serde(default)]
    pub route: HierarchyPath,
    pub id: String,
}

/// 切换分组模式请求体。
#[derive(Debug, Deserialize)]
pub struct GroupingModeRequest {
    pub mode: String,
}

/// 定时刷新状态。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStateDto {
    pub enabled: bool,
    pub torn_down: bool,
    pub interval_seconds: u64,
}

/// 单次刷新周期结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReportDto {
    /// completed / skipped / failed
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub visible: usize,
    pub fetches: usize,
    pub patches: usize,
    pub rows_updated: usize,
}

/// 某路径在视图中的数据。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStateDto {
    pub route: HierarchyPath,
    pub rows: Vec<RowRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    pub load_failed: bool,
}

/// 网格会话状态。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStateDto {
    pub mode: String,
    pub refresh: RefreshStateDto,
    pub scroll_top: u64,
    pub expanded: Vec<HierarchyPath>,
    pub routes: Vec<RouteStateDto>,
}
