//! 分组模式与层级路径。
//!
//! | 模式 | depth 0 | depth 1 | depth 2 |
//! |---|---|---|---|
//! | location-bridge-camera | Location | Bridge（locationId） | Camera（locationId, bridgeId） |
//! | location-camera | Location | Camera（locationId） | - |
//! | bridge-camera | Bridge | Camera（bridgeId） | - |

use crate::DomainError;
use crate::entity::{Entity, EntityKind};
use crate::filter::EntityFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupingMode {
    #[default]
    #[serde(rename = "location-bridge-camera")]
    LocationBridgeCamera,
    #[serde(rename = "location-camera")]
    LocationCamera,
    #[serde(rename = "bridge-camera")]
    BridgeCamera,
}

const LOCATION_BRIDGE_CAMERA: [EntityKind; 3] =
    [EntityKind::Location, EntityKind::Bridge, EntityKind::Camera];
const LOCATION_CAMERA: [EntityKind; 2] = [EntityKind::Location, EntityKind::Camera];
const BRIDGE_CAMERA: [EntityKind; 2] = [EntityKind::Bridge, EntityKind::Camera];

impl GroupingMode {
    pub const ALL: [GroupingMode; 3] = [
        Self::LocationBridgeCamera,
        Self::LocationCamera,
        Self::BridgeCamera,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocationBridgeCamera => "location-bridge-camera",
            Self::LocationCamera => "location-camera",
            Self::BridgeCamera => "bridge-camera",
        }
    }

    /// 每一层对应的实体种类，最后一层恒为 Camera（叶子）。
    pub fn levels(&self) -> &'static [EntityKind] {
        match self {
            Self::LocationBridgeCamera => &LOCATION_BRIDGE_CAMERA,
            Self::LocationCamera => &LOCATION_CAMERA,
            Self::BridgeCamera => &BRIDGE_CAMERA,
        }
    }

    pub fn depth_count(&self) -> usize {
        self.levels().len()
    }

    /// depth 对应的实体种类；超出模式层数时返回 None。
    pub fn kind_at(&self, depth: usize) -> Option<EntityKind> {
        self.levels().get(depth).copied()
    }

    pub fn is_leaf_depth(&self, depth: usize) -> bool {
        depth + 1 == self.depth_count()
    }

    /// 实体种类在该模式中的层级；被跳过的种类返回 None。
    pub fn depth_of(&self, kind: EntityKind) -> Option<usize> {
        self.levels().iter().position(|level| *level == kind)
    }

    /// 路径对应的祖先等值过滤。
    ///
    /// 路径第 i 个元素是第 i 层实体的 id：Location 层映射为 `location_id`，Bridge 层映射为 `bridge_id`。
    /// 路径长度超出模式层数时返回 None。
    pub fn ancestor_filter(&self, path: &HierarchyPath) -> Option<EntityFilter> {
        if path.depth() >= self.depth_count() {
            return None;
        }
        let mut filter = EntityFilter::default();
        for (level, key) in self.levels().iter().zip(path.keys()) {
            match level {
                EntityKind::Location => filter.location_id = Some(key.clone()),
                EntityKind::Bridge => filter.bridge_id = Some(key.clone()),
                EntityKind::Camera => return None,
            }
        }
        Some(filter)
    }

    /// 实体在该模式下所在节点的路径（其父节点路径）。
    ///
    /// 实体种类不在该模式中（例如 location-camera 下的 Bridge）时返回 None。
    pub fn route_of(&self, entity: &Entity) -> Option<HierarchyPath> {
        let depth = self.depth_of(entity.kind())?;
        let mut keys = Vec::with_capacity(depth);
        for level in &self.levels()[..depth] {
            keys.push(entity.key_for(*level)?.to_string());
        }
        Some(HierarchyPath::new(keys))
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "location-bridge-camera" => Ok(Self::LocationBridgeCamera),
            "location-camera" => Ok(Self::LocationCamera),
            "bridge-camera" => Ok(Self::BridgeCamera),
            _ => Err(DomainError::UnknownGroupingMode(value.to_string())),
        }
    }
}

/// 层级路径：祖先 id 的有序序列（0~2 个元素）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyPath(Vec<String>);

impl HierarchyPath {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// 子节点路径。
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }
}

impl<S: Into<String>> FromIterator<S> for HierarchyPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
