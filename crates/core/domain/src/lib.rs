//! 摄像头网格的领域模型。
//!
//! - 实体：Location / Bridge / Camera（`Entity` 标签联合）
//! - 过滤：`EntityFilter`（等值 + 成员过滤，字段之间为 AND）
//! - 分组：`GroupingMode` 决定每一层拉取哪种实体、附加哪些祖先过滤
//! - 路径：`HierarchyPath` 标识树中一个可展开节点
//! - 行：`RowRecord` 是交给渲染层的显式行结构

pub mod entity;
pub mod filter;
pub mod grouping;
pub mod row;

pub use entity::{Bridge, Camera, Entity, EntityKind, EntityStatus, Location};
pub use filter::EntityFilter;
pub use grouping::{GroupingMode, HierarchyPath};
pub use row::RowRecord;

/// 领域值解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("unknown entity status: {0}")]
    UnknownStatus(String),
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
    #[error("unknown grouping mode: {0}")]
    UnknownGroupingMode(String),
}
