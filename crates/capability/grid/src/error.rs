use camgrid_storage::FetchError;
use domain::GroupingMode;

/// 网格加载错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid page token: {0}")]
    InvalidCursor(String),
    #[error("fetch failed: {0}")]
    FetchFailure(String),
    #[error("depth {depth} is not defined for grouping mode {mode}")]
    UnsupportedDepth { mode: GroupingMode, depth: usize },
}

impl From<FetchError> for GridError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidCursor(message) => Self::InvalidCursor(message),
            FetchError::Backend(message) => Self::FetchFailure(message),
        }
    }
}
