//! 存储层错误类型
//!
//! - `StorageError`：存储内部错误（锁失败、数据不一致）
//! - `FetchError`：分页拉取契约对外暴露的错误（非法游标 / 后端错误）

use camgrid_pagination::PaginationError;

#[derive(Debug)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// 分页拉取错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid page token: {0}")]
    InvalidCursor(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<PaginationError> for FetchError {
    fn from(err: PaginationError) -> Self {
        match err {
            PaginationError::InvalidCursor(message) => Self::InvalidCursor(message),
        }
    }
}

impl From<StorageError> for FetchError {
    fn from(err: StorageError) -> Self {
        Self::Backend(err.to_string())
    }
}
