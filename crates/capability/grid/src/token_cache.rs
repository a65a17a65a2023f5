//! 节点级分页游标缓存
//!
//! 每个层级节点（`depth + 路径`）保存最近一次拉取返回的 next/prev 游标及其请求偏移。
//! 下一次请求只给出起始行号，方向由偏移差推断：
//!
//! | 条件 | 方向 | 发送的游标 |
//! |---|---|---|
//! | 无缓存 / 请求偏移为 0 | Restart | 无 |
//! | 请求偏移 > 上次偏移 | Forward | next |
//! | 请求偏移 < 上次偏移 | Backward | prev |
//! | 请求偏移 == 上次偏移 | Repeat | 无 |
//!
//! 缓存只是建议：任何结果都不会导致失败。

use domain::HierarchyPath;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

/// 翻页方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Restart,
    Forward,
    Backward,
    Repeat,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Repeat => "repeat",
        }
    }
}

/// 由上次请求偏移与本次请求偏移推断翻页方向。
pub fn infer_direction(last_offset: Option<usize>, requested_offset: usize) -> Direction {
    let Some(last_offset) = last_offset else {
        return Direction::Restart;
    };
    if requested_offset == 0 {
        return Direction::Restart;
    }
    match requested_offset.cmp(&last_offset) {
        std::cmp::Ordering::Greater => Direction::Forward,
        std::cmp::Ordering::Less => Direction::Backward,
        std::cmp::Ordering::Equal => Direction::Repeat,
    }
}

/// 单个节点的缓存项。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub last_requested_offset: usize,
}

/// 游标解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub direction: Direction,
    pub cursor: Option<String>,
}

/// 节点级游标缓存。
///
/// 由拥有它的网格会话创建和持有，随会话一起销毁。
#[derive(Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    path_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 节点缓存键：`level:{depth}:{k1:k2}`。
    pub fn key_for(depth: usize, path: &HierarchyPath) -> String {
        format!("level:{}:{}", depth, path.keys().join(":"))
    }

    /// 推断方向并给出应发送的游标。
    pub fn resolve(&self, key: &str, requested_offset: usize) -> Resolution {
        let entry = self
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned());
        let direction = infer_direction(
            entry.as_ref().map(|item| item.last_requested_offset),
            requested_offset,
        );
        let cursor = match (direction, entry) {
            (Direction::Forward, Some(entry)) => entry.next_cursor,
            (Direction::Backward, Some(entry)) => entry.prev_cursor,
            _ => None,
        };
        debug!(
            target: "camgrid.grid",
            key = %key,
            requested_offset,
            direction = direction.as_str(),
            has_cursor = cursor.is_some(),
            "cursor_resolved"
        );
        Resolution { direction, cursor }
    }

    /// 只返回游标的简化形式。
    pub fn resolve_cursor(&self, key: &str, requested_offset: usize) -> Option<String> {
        self.resolve(key, requested_offset).cursor
    }

    /// 覆盖写入节点缓存项（后写者生效，不合并）。
    pub fn record(
        &self,
        key: &str,
        requested_offset: usize,
        next_cursor: Option<String>,
        prev_cursor: Option<String>,
    ) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(
            key.to_string(),
            CacheEntry {
                next_cursor,
                prev_cursor,
                last_requested_offset: requested_offset,
            },
        );
    }

    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 同一节点的请求锁；持有期间覆盖 解析 → 拉取 → 写入。
    pub fn path_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .path_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
