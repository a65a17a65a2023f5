//! 实体内存存储实现
//!
//! 功能：
//! - 按插入顺序保存 Location / Bridge / Camera
//! - 过滤列出、按 id 查找
//! - Bridge/Camera 状态变更（目标不存在返回 `success = false`）

use crate::error::StorageError;
use crate::generator::{SeedConfig, SeedData, generate};
use crate::models::{MutationResult, StoreStats};
use crate::traits::EntityStore;
use crate::validation::{ensure_id, ensure_status_kind};
use domain::{Bridge, Camera, Entity, EntityFilter, EntityKind, EntityStatus, Location};
use std::sync::RwLock;
use tracing::{info, warn};

/// 实体内存存储
///
/// 使用 RwLock + Vec 保持插入顺序（分页依赖该顺序稳定）。
pub struct InMemoryEntityStore {
    locations: RwLock<Vec<Location>>,
    bridges: RwLock<Vec<Bridge>>,
    cameras: RwLock<Vec<Camera>>,
}

impl InMemoryEntityStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::from_seed(SeedData::default())
    }

    /// 按生成规模创建存储
    pub fn with_seed(config: SeedConfig) -> Self {
        let store = Self::from_seed(generate(config));
        info!(
            target: "camgrid.storage",
            locations = config.locations,
            bridges_per_location = config.bridges_per_location,
            cameras_per_bridge = config.cameras_per_bridge,
            "entity_store_seeded"
        );
        store
    }

    /// 使用给定数据创建存储
    pub fn from_seed(data: SeedData) -> Self {
        Self {
            locations: RwLock::new(data.locations),
            bridges: RwLock::new(data.bridges),
            cameras: RwLock::new(data.cameras),
        }
    }

    fn snapshot(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
        let items = match kind {
            EntityKind::Location => self
                .locations
                .read()
                .map_err(|_| StorageError::new("lock failed"))?
                .iter()
                .cloned()
                .map(Entity::from)
                .collect(),
            EntityKind::Bridge => self
                .bridges
                .read()
                .map_err(|_| StorageError::new("lock failed"))?
                .iter()
                .cloned()
                .map(Entity::from)
                .collect(),
            EntityKind::Camera => self
                .cameras
                .read()
                .map_err(|_| StorageError::new("lock failed"))?
                .iter()
                .cloned()
                .map(Entity::from)
                .collect(),
        };
        Ok(items)
    }
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn list_entities(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> Result<Vec<Entity>, StorageError> {
        let items = self
            .snapshot(kind)?
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();
        Ok(items)
    }

    async fn find_entity(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<Entity>, StorageError> {
        ensure_id(id)?;
        Ok(self.snapshot(kind)?.into_iter().find(|item| item.id() == id))
    }

    async fn update_status(
        &self,
        kind: EntityKind,
        id: &str,
        status: EntityStatus,
    ) -> Result<MutationResult, StorageError> {
        ensure_id(id)?;
        if let Err(err) = ensure_status_kind(kind) {
            return Ok(MutationResult::failed(err.to_string()));
        }
        let previous = match kind {
            EntityKind::Bridge => {
                let mut bridges = self
                    .bridges
                    .write()
                    .map_err(|_| StorageError::new("lock failed"))?;
                bridges
                    .iter_mut()
                    .find(|item| item.id == id)
                    .map(|item| std::mem::replace(&mut item.status, status))
            }
            EntityKind::Camera => {
                let mut cameras = self
                    .cameras
                    .write()
                    .map_err(|_| StorageError::new("lock failed"))?;
                cameras
                    .iter_mut()
                    .find(|item| item.id == id)
                    .map(|item| std::mem::replace(&mut item.status, status))
            }
            EntityKind::Location => None,
        };
        match previous {
            Some(previous) => {
                info!(
                    target: "camgrid.storage",
                    kind = %kind,
                    id = %id,
                    from = %previous,
                    to = %status,
                    "entity_status_updated"
                );
                Ok(MutationResult::ok(format!(
                    "{} {} status updated to {}",
                    kind.label(),
                    id,
                    status
                )))
            }
            None => {
                warn!(target: "camgrid.storage", kind = %kind, id = %id, "entity_not_found");
                Ok(MutationResult::failed(format!(
                    "{} {} not found",
                    kind.label(),
                    id
                )))
            }
        }
    }

    async fn stats(&self) -> Result<StoreStats, StorageError> {
        let mut stats = StoreStats {
            locations: self
                .locations
                .read()
                .map_err(|_| StorageError::new("lock failed"))?
                .len(),
            ..StoreStats::default()
        };
        for bridge in self
            .bridges
            .read()
            .map_err(|_| StorageError::new("lock failed"))?
            .iter()
        {
            stats.bridges.add(bridge.status);
        }
        for camera in self
            .cameras
            .read()
            .map_err(|_| StorageError::new("lock failed"))?
            .iter()
        {
            stats.cameras.add(camera.status);
        }
        Ok(stats)
    }
}
