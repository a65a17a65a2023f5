//! 分页错误类型

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// 游标无法解码，或与当前过滤条件不匹配
    #[error("invalid page token: {0}")]
    InvalidCursor(String),
}
