//! 验证辅助函数
//!
//! - ensure_id：验证实体 id 非空
//! - ensure_status_kind：验证实体种类带状态字段（Location 无状态）

use crate::error::StorageError;
use domain::EntityKind;

/// 验证实体 id 非空
pub fn ensure_id(id: &str) -> Result<(), StorageError> {
    if id.trim().is_empty() {
        return Err(StorageError::new("entity id required"));
    }
    Ok(())
}

/// 验证实体种类支持状态变更
pub fn ensure_status_kind(kind: EntityKind) -> Result<(), StorageError> {
    if !kind.has_status() {
        return Err(StorageError::new(format!(
            "{} has no status",
            kind.label()
        )));
    }
    Ok(())
}
