//! 统计 handler：实体计数 + 进程内指标快照。

use crate::AppState;
use crate::utils::{ok_response, stats_to_dto, storage_error};
use axum::{extract::State, response::Response};
use camgrid_telemetry::metrics;

pub async fn get_stats(State(state): State<AppState>) -> Response {
    match state.store.stats().await {
        Ok(stats) => ok_response(stats_to_dto(stats, metrics().snapshot())),
        Err(err) => storage_error(err),
    }
}
