//! 存储数据模型
//!
//! - 分页拉取请求：PageRequest
//! - 状态变更结果：MutationResult
//! - 统计：StoreStats, StatusCounts

use domain::{EntityFilter, EntityKind, EntityStatus};
use serde::Serialize;

/// 一次分页拉取请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: EntityKind,
    pub filter: EntityFilter,
    pub cursor: Option<String>,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(kind: EntityKind, filter: EntityFilter, page_size: usize) -> Self {
        Self {
            kind,
            filter,
            cursor: None,
            page_size,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// 状态变更结果（目标不存在时 `success = false`，不作为错误抛出）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    pub success: bool,
    pub message: Option<String>,
}

impl MutationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// 各状态计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub online: usize,
    pub offline: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: EntityStatus) {
        match status {
            EntityStatus::Online => self.online += 1,
            EntityStatus::Offline => self.offline += 1,
            EntityStatus::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.online + self.offline + self.error
    }
}

/// 存储统计（调试用）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub locations: usize,
    pub bridges: StatusCounts,
    pub cameras: StatusCounts,
}
