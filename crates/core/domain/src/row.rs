//! 交给渲染层的行记录。

use crate::entity::{Entity, EntityKind, EntityStatus};
use serde::{Deserialize, Serialize};

/// 网格行。
///
/// 分组行（`is_group = true`）把实体自身 id 同时写入对应的分组键字段
/// （Location → `location_id`，Bridge → `bridge_id`）；叶子行只携带外键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    pub id: String,
    pub kind: EntityKind,
    pub is_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl RowRecord {
    pub fn group(entity: &Entity) -> Self {
        let mut row = Self::leaf(entity);
        row.is_group = true;
        match entity {
            Entity::Location(item) => row.location_id = Some(item.id.clone()),
            Entity::Bridge(item) => row.bridge_id = Some(item.id.clone()),
            Entity::Camera(_) => {}
        }
        row
    }

    pub fn leaf(entity: &Entity) -> Self {
        Self {
            id: entity.id().to_string(),
            kind: entity.kind(),
            is_group: false,
            location_id: entity.location_id().map(str::to_string),
            bridge_id: entity.bridge_id().map(str::to_string),
            status: entity.status(),
        }
    }
}
