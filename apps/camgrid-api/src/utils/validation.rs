//! 输入验证辅助函数
//!
//! - normalize_required：去除首尾空格并检查非空
//! - parse_status / parse_grouping_mode：解析领域枚举，失败返回 bad_request_error 响应

use crate::utils::response::bad_request_error;
use axum::response::Response;
use domain::{EntityStatus, GroupingMode};

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

pub fn parse_status(value: String) -> Result<EntityStatus, Response> {
    let value = normalize_required(value, "status")?;
    value
        .parse::<EntityStatus>()
        .map_err(|err| bad_request_error(err.to_string()))
}

pub fn parse_grouping_mode(value: String) -> Result<GroupingMode, Response> {
    let value = normalize_required(value, "mode")?;
    value
        .parse::<GroupingMode>()
        .map_err(|err| bad_request_error(err.to_string()))
}
