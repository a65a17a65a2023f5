//! 存储接口 Trait 定义
//!
//! - EntityStore：实体存储（按插入顺序列出、按 id 查找、状态变更）
//! - PageFetcher：分页拉取服务（网格核心唯一依赖的后端契约）
//!
//! 设计原则：
//! - 使用 async_trait 支持动态分发
//! - 分页拉取只返回结构化错误 `FetchError`

use crate::error::{FetchError, StorageError};
use crate::models::{MutationResult, PageRequest, StoreStats};
use async_trait::async_trait;
use camgrid_pagination::Page;
use domain::{Entity, EntityFilter, EntityKind, EntityStatus};

/// 实体存储接口
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// 按插入顺序列出满足过滤条件的实体
    async fn list_entities(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> Result<Vec<Entity>, StorageError>;

    /// 查找指定实体
    async fn find_entity(&self, kind: EntityKind, id: &str)
    -> Result<Option<Entity>, StorageError>;

    /// 更新 Bridge/Camera 状态；目标不存在时返回 `success = false`
    async fn update_status(
        &self,
        kind: EntityKind,
        id: &str,
        status: EntityStatus,
    ) -> Result<MutationResult, StorageError>;

    /// 统计
    async fn stats(&self) -> Result<StoreStats, StorageError>;
}

/// 分页拉取服务
///
/// 过滤字段之间为 AND；`id_in` / `status_in` 为成员过滤；祖先 id 为外键等值过滤。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Entity>, FetchError>;
}
