//! 网格视图抽象与内存视图模型
//!
//! - `GridView`：刷新器依赖的渲染面接口（列出已渲染节点、按路径应用补丁）
//! - `InMemoryGridView`：按路径与绝对行号保存已加载的行，以及展开集合、行数、失败标记和滚动位置
//!
//! 补丁只按 id 原地更新已存在的行，不改动滚动位置与展开状态。

use domain::{HierarchyPath, RowRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

/// 当前渲染中的一个节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    /// 节点所在的父路径
    pub route: HierarchyPath,
    pub row: RowRecord,
    /// 分组行是否展开（叶子行恒为 false）
    pub expanded: bool,
}

/// 针对某个路径的一批新行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePatch {
    pub route: HierarchyPath,
    pub rows: Vec<RowRecord>,
}

/// 渲染面接口。
pub trait GridView: Send + Sync {
    fn rendered_nodes(&self) -> Vec<RenderedNode>;

    /// 应用补丁，返回实际更新的行数。
    fn apply_patch(&self, patch: &RoutePatch) -> usize;
}

/// 某路径下已加载的行。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteData {
    /// 按行号排列的已加载行，未加载的位置跳过
    pub rows: Vec<RowRecord>,
    pub row_count: Option<usize>,
    pub load_failed: bool,
}

/// 视图快照（调试与 HTTP 状态输出）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub routes: BTreeMap<HierarchyPath, RouteData>,
    pub expanded: BTreeSet<HierarchyPath>,
    pub scroll_top: u64,
}

/// 按绝对行号存放的行；尚未加载的位置为 `None`。
#[derive(Default)]
struct RouteSlots {
    slots: Vec<Option<RowRecord>>,
    row_count: Option<usize>,
    load_failed: bool,
}

impl RouteSlots {
    fn loaded(&self) -> impl Iterator<Item = &RowRecord> {
        self.slots.iter().flatten()
    }

    fn to_data(&self) -> RouteData {
        RouteData {
            rows: self.loaded().cloned().collect(),
            row_count: self.row_count,
            load_failed: self.load_failed,
        }
    }
}

#[derive(Default)]
struct ViewState {
    routes: BTreeMap<HierarchyPath, RouteSlots>,
    expanded: BTreeSet<HierarchyPath>,
    scroll_top: u64,
}

/// 内存视图模型。
#[derive(Default)]
pub struct InMemoryGridView {
    state: Mutex<ViewState>,
}

impl InMemoryGridView {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 写入一个行块：按绝对行号 `start_row` 起覆盖，行块到达顺序不影响结果。
    pub fn record_rows(
        &self,
        route: &HierarchyPath,
        start_row: usize,
        rows: Vec<RowRecord>,
        row_count: Option<usize>,
    ) {
        let mut state = self.state();
        let data = state.routes.entry(route.clone()).or_default();
        let end = start_row + rows.len();
        if data.slots.len() < end {
            data.slots.resize(end, None);
        }
        for (slot, row) in data.slots[start_row..end].iter_mut().zip(rows) {
            *slot = Some(row);
        }
        if row_count.is_some() {
            data.row_count = row_count;
        }
        data.load_failed = false;
    }

    /// 标记路径加载失败（已加载的行保留）。
    pub fn record_failure(&self, route: &HierarchyPath) {
        self.state()
            .routes
            .entry(route.clone())
            .or_default()
            .load_failed = true;
    }

    /// 展开 `route` 下 id 为 `id` 的分组行。
    pub fn expand(&self, route: &HierarchyPath, id: &str) {
        self.state().expanded.insert(route.child(id));
    }

    pub fn collapse(&self, route: &HierarchyPath, id: &str) {
        self.state().expanded.remove(&route.child(id));
    }

    pub fn is_expanded(&self, route: &HierarchyPath, id: &str) -> bool {
        self.state().expanded.contains(&route.child(id))
    }

    pub fn set_scroll_top(&self, scroll_top: u64) {
        self.state().scroll_top = scroll_top;
    }

    pub fn scroll_top(&self) -> u64 {
        self.state().scroll_top
    }

    pub fn route(&self, route: &HierarchyPath) -> Option<RouteData> {
        self.state().routes.get(route).map(RouteSlots::to_data)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.state();
        ViewSnapshot {
            routes: state
                .routes
                .iter()
                .map(|(route, data)| (route.clone(), data.to_data()))
                .collect(),
            expanded: state.expanded.clone(),
            scroll_top: state.scroll_top,
        }
    }

    pub fn clear(&self) {
        *self.state() = ViewState::default();
    }
}

impl GridView for InMemoryGridView {
    /// 从根路径出发深度优先遍历：只有展开的分组才会渲染其子路径。
    fn rendered_nodes(&self) -> Vec<RenderedNode> {
        let state = self.state();
        let mut nodes = Vec::new();
        let mut pending = vec![HierarchyPath::root()];
        while let Some(route) = pending.pop() {
            let Some(data) = state.routes.get(&route) else {
                continue;
            };
            for row in data.loaded() {
                let child = route.child(row.id.clone());
                let expanded = row.is_group && state.expanded.contains(&child);
                if expanded {
                    pending.push(child);
                }
                nodes.push(RenderedNode {
                    route: route.clone(),
                    row: row.clone(),
                    expanded,
                });
            }
        }
        nodes
    }

    fn apply_patch(&self, patch: &RoutePatch) -> usize {
        let mut state = self.state();
        let Some(data) = state.routes.get_mut(&patch.route) else {
            return 0;
        };
        let mut updated = 0;
        for fresh in &patch.rows {
            if let Some(row) = data
                .slots
                .iter_mut()
                .flatten()
                .find(|row| row.id == fresh.id)
            {
                *row = fresh.clone();
                updated += 1;
            }
        }
        updated
    }
}
