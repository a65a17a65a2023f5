//! 实体模型：Location → Bridge → Camera。

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 设备状态（Bridge/Camera 才有）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Online,
    Offline,
    Error,
}

impl EntityStatus {
    pub const ALL: [EntityStatus; 3] = [Self::Online, Self::Offline, Self::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "error" => Ok(Self::Error),
            _ => Err(DomainError::UnknownStatus(value.to_string())),
        }
    }
}

/// 实体种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Location,
    Bridge,
    Camera,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Location, Self::Bridge, Self::Camera];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Bridge => "bridge",
            Self::Camera => "camera",
        }
    }

    /// 面向用户消息的名称（首字母大写）。
    pub fn label(&self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Bridge => "Bridge",
            Self::Camera => "Camera",
        }
    }

    /// 是否带状态字段。
    pub fn has_status(&self) -> bool {
        !matches!(self, Self::Location)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    /// 同时接受单复数形式（`camera` / `cameras`），便于直接解析 URL 段。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "location" | "locations" => Ok(Self::Location),
            "bridge" | "bridges" => Ok(Self::Bridge),
            "camera" | "cameras" => Ok(Self::Camera),
            _ => Err(DomainError::UnknownKind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bridge {
    pub id: String,
    pub location_id: String,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub location_id: String,
    pub bridge_id: String,
    pub status: EntityStatus,
}

/// 三种实体的标签联合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Location(Location),
    Bridge(Bridge),
    Camera(Camera),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Self::Location(item) => &item.id,
            Self::Bridge(item) => &item.id,
            Self::Camera(item) => &item.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Location(_) => EntityKind::Location,
            Self::Bridge(_) => EntityKind::Bridge,
            Self::Camera(_) => EntityKind::Camera,
        }
    }

    pub fn status(&self) -> Option<EntityStatus> {
        match self {
            Self::Location(_) => None,
            Self::Bridge(item) => Some(item.status),
            Self::Camera(item) => Some(item.status),
        }
    }

    /// 所属 Location（Location 自身返回 None）。
    pub fn location_id(&self) -> Option<&str> {
        match self {
            Self::Location(_) => None,
            Self::Bridge(item) => Some(&item.location_id),
            Self::Camera(item) => Some(&item.location_id),
        }
    }

    /// 所属 Bridge（仅 Camera 有）。
    pub fn bridge_id(&self) -> Option<&str> {
        match self {
            Self::Camera(item) => Some(&item.bridge_id),
            _ => None,
        }
    }

    /// 实体在某一分组层作为祖先时的键。
    ///
    /// Location 层取 location_id，Bridge 层取 bridge_id；实体自身即该层时返回自身 id。
    pub fn key_for(&self, level: EntityKind) -> Option<&str> {
        if self.kind() == level {
            return Some(self.id());
        }
        match level {
            EntityKind::Location => self.location_id(),
            EntityKind::Bridge => self.bridge_id(),
            EntityKind::Camera => None,
        }
    }
}

impl From<Location> for Entity {
    fn from(value: Location) -> Self {
        Self::Location(value)
    }
}

impl From<Bridge> for Entity {
    fn from(value: Bridge) -> Self {
        Self::Bridge(value)
    }
}

impl From<Camera> for Entity {
    fn from(value: Camera) -> Self {
        Self::Camera(value)
    }
}
