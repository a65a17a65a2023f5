//! 实体过滤条件。
//!
//! 所有字段之间为 AND；`status_in` / `id_in` 为成员过滤（字段内 OR），空列表视为不过滤。
//! `location_id` / `bridge_id` 为外键等值过滤。

use crate::entity::{Entity, EntityKind, EntityStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_in: Vec<EntityStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_in: Vec<String>,
}

impl EntityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn with_bridge(mut self, bridge_id: impl Into<String>) -> Self {
        self.bridge_id = Some(bridge_id.into());
        self
    }

    pub fn with_status_in(mut self, statuses: impl IntoIterator<Item = EntityStatus>) -> Self {
        self.status_in = statuses.into_iter().collect();
        self
    }

    pub fn with_id_in<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_in = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.location_id.is_none()
            && self.bridge_id.is_none()
            && self.status_in.is_empty()
            && self.id_in.is_empty()
    }

    /// 合并另一组条件：`other` 中出现的字段覆盖当前值。
    pub fn merged(mut self, other: &EntityFilter) -> Self {
        if other.location_id.is_some() {
            self.location_id = other.location_id.clone();
        }
        if other.bridge_id.is_some() {
            self.bridge_id = other.bridge_id.clone();
        }
        if !other.status_in.is_empty() {
            self.status_in = other.status_in.clone();
        }
        if !other.id_in.is_empty() {
            self.id_in = other.id_in.clone();
        }
        self
    }

    /// 只保留某种实体支持的字段，并对成员列表排序去重。
    ///
    /// - Location：id_in
    /// - Bridge：location_id、status_in、id_in
    /// - Camera：全部
    ///
    /// 结果即该实体种类下的过滤指纹。
    pub fn scoped_to(&self, kind: EntityKind) -> EntityFilter {
        let mut status_in = self.status_in.clone();
        status_in.sort();
        status_in.dedup();
        let mut id_in = self.id_in.clone();
        id_in.sort();
        id_in.dedup();
        match kind {
            EntityKind::Location => EntityFilter {
                id_in,
                ..EntityFilter::default()
            },
            EntityKind::Bridge => EntityFilter {
                location_id: self.location_id.clone(),
                bridge_id: None,
                status_in,
                id_in,
            },
            EntityKind::Camera => EntityFilter {
                location_id: self.location_id.clone(),
                bridge_id: self.bridge_id.clone(),
                status_in,
                id_in,
            },
        }
    }

    /// 判断实体是否满足当前条件（按实体种类忽略不支持的字段）。
    pub fn matches(&self, entity: &Entity) -> bool {
        let scoped = self.scoped_to(entity.kind());
        if let Some(location_id) = &scoped.location_id {
            if entity.location_id() != Some(location_id.as_str()) {
                return false;
            }
        }
        if let Some(bridge_id) = &scoped.bridge_id {
            if entity.bridge_id() != Some(bridge_id.as_str()) {
                return false;
            }
        }
        if !scoped.status_in.is_empty() {
            match entity.status() {
                Some(status) if scoped.status_in.contains(&status) => {}
                _ => return false,
            }
        }
        if !scoped.id_in.is_empty() && !scoped.id_in.iter().any(|id| id == entity.id()) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Bridge, Camera, Location};

    fn camera(id: &str, location: &str, bridge: &str, status: EntityStatus) -> Entity {
        Entity::Camera(Camera {
            id: id.to_string(),
            location_id: location.to_string(),
            bridge_id: bridge.to_string(),
            status,
        })
    }

    #[test]
    fn filter_fields_are_anded() {
        let filter = EntityFilter::new()
            .with_bridge("Bridge-1")
            .with_status_in([EntityStatus::Online]);
        assert!(filter.matches(&camera("Camera-1", "Location-1", "Bridge-1", EntityStatus::Online)));
        assert!(!filter.matches(&camera("Camera-2", "Location-1", "Bridge-1", EntityStatus::Error)));
        assert!(!filter.matches(&camera("Camera-3", "Location-1", "Bridge-2", EntityStatus::Online)));
    }

    #[test]
    fn membership_lists_are_ored() {
        let filter = EntityFilter::new()
            .with_status_in([EntityStatus::Offline, EntityStatus::Error])
            .with_id_in(["Camera-1", "Camera-2"]);
        assert!(filter.matches(&camera("Camera-1", "L", "B", EntityStatus::Error)));
        assert!(filter.matches(&camera("Camera-2", "L", "B", EntityStatus::Offline)));
        assert!(!filter.matches(&camera("Camera-3", "L", "B", EntityStatus::Error)));
    }

    #[test]
    fn unsupported_fields_are_ignored_per_kind() {
        let filter = EntityFilter::new()
            .with_location("Location-9")
            .with_status_in([EntityStatus::Error]);
        let location = Entity::Location(Location {
            id: "Location-1".to_string(),
        });
        assert!(filter.matches(&location));

        let bridge = Entity::Bridge(Bridge {
            id: "Bridge-1".to_string(),
            location_id: "Location-1".to_string(),
            status: EntityStatus::Error,
        });
        assert!(!filter.matches(&bridge));
        assert!(filter.clone().with_location("Location-1").matches(&bridge));
    }

    #[test]
    fn scoped_fingerprint_is_order_insensitive() {
        let a = EntityFilter::new().with_status_in([EntityStatus::Error, EntityStatus::Online]);
        let b = EntityFilter::new().with_status_in([EntityStatus::Online, EntityStatus::Error]);
        assert_eq!(
            a.scoped_to(EntityKind::Camera),
            b.scoped_to(EntityKind::Camera)
        );
        assert!(a.scoped_to(EntityKind::Location).is_empty());
    }
}
