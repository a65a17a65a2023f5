//! 可见行定时刷新
//!
//! 每个周期：
//! 1. 从视图收集可见实体集合（叶子行，以及已展开的分组行）
//! 2. 集合为空则跳过
//! 3. 每个非空集合并行发起一次 `id_in` 拉取（携带当前状态过滤，不经过游标缓存）
//! 4. 按实体所在路径分组成补丁，逐个应用到视图
//!
//! 每次启用都会生成新的存活令牌；停用或销毁时令牌失效，
//! 已在途的周期在写视图前检查令牌，失效则丢弃结果。

use crate::view::{GridView, RenderedNode, RoutePatch};
use camgrid_storage::{FetchError, PageFetcher, PageRequest};
use camgrid_telemetry::{
    record_fetch_failure, record_page_fetched, record_patches_applied, record_reconcile_cycle,
    record_reconcile_failed, record_reconcile_skipped,
};
use domain::{
    Entity, EntityFilter, EntityKind, EntityStatus, GroupingMode, HierarchyPath, RowRecord,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// 默认刷新周期。
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// 本周期需要刷新的实体 id。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    pub locations: BTreeSet<String>,
    pub bridges: BTreeSet<String>,
    pub cameras: BTreeSet<String>,
}

impl VisibleSet {
    pub fn collect(nodes: &[RenderedNode]) -> Self {
        let mut set = Self::default();
        for node in nodes {
            if node.row.is_group && !node.expanded {
                continue;
            }
            let id = node.row.id.clone();
            match node.row.kind {
                EntityKind::Location => set.locations.insert(id),
                EntityKind::Bridge => set.bridges.insert(id),
                EntityKind::Camera => set.cameras.insert(id),
            };
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.bridges.is_empty() && self.cameras.is_empty()
    }

    pub fn len(&self) -> usize {
        self.locations.len() + self.bridges.len() + self.cameras.len()
    }
}

/// 跳过原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 刷新未启用或已销毁
    Disabled,
    /// 没有可见数据
    NothingVisible,
    /// 周期进行中被停用，结果已丢弃
    Discarded,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::NothingVisible => "nothing_visible",
            Self::Discarded => "discarded",
        }
    }
}

/// 一个完成周期的统计。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub visible: usize,
    pub fetches: usize,
    pub patches: usize,
    pub rows_updated: usize,
}

/// 周期结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Skipped(SkipReason),
    Failed(String),
}

struct ReconcilerInner {
    mode: GroupingMode,
    fetcher: Arc<dyn PageFetcher>,
    view: Arc<dyn GridView>,
    status_filter: RwLock<Vec<EntityStatus>>,
}

#[derive(Default)]
struct TaskState {
    liveness: Option<Arc<AtomicBool>>,
    task: Option<JoinHandle<()>>,
    torn_down: bool,
}

/// 可见行刷新器。
pub struct Reconciler {
    inner: Arc<ReconcilerInner>,
    interval: Duration,
    state: Mutex<TaskState>,
}

impl Reconciler {
    pub fn new(
        mode: GroupingMode,
        fetcher: Arc<dyn PageFetcher>,
        view: Arc<dyn GridView>,
        interval: Duration,
    ) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_REFRESH_INTERVAL
        } else {
            interval
        };
        Self {
            inner: Arc::new(ReconcilerInner {
                mode,
                fetcher,
                view,
                status_filter: RwLock::new(Vec::new()),
            }),
            interval,
            state: Mutex::new(TaskState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, TaskState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.state().liveness.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state().torn_down
    }

    /// 更新刷新时携带的状态过滤。
    pub fn set_status_filter(&self, statuses: &[EntityStatus]) {
        let mut current = self
            .inner
            .status_filter
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = statuses.to_vec();
    }

    /// 启用并启动定时任务；首次触发在一个周期之后。
    ///
    /// 已启用或已销毁时不做任何事。需要在 tokio 运行时内调用。
    pub fn enable(&self) {
        let mut state = self.state();
        if state.torn_down || state.liveness.is_some() {
            return;
        }
        let liveness = Arc::new(AtomicBool::new(true));
        let inner = self.inner.clone();
        let token = liveness.clone();
        let period = self.interval;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !token.load(Ordering::SeqCst) {
                    break;
                }
                inner.run_cycle(&token).await;
            }
        });
        state.liveness = Some(liveness);
        state.task = Some(task);
        info!(
            target: "camgrid.refresh",
            mode = %self.inner.mode,
            interval_ms = period.as_millis() as u64,
            "auto_refresh_started"
        );
    }

    /// 停用并停止定时任务；在途周期的结果将被丢弃。
    pub fn disable(&self) {
        let mut state = self.state();
        let was_enabled = stop(&mut state);
        if was_enabled {
            info!(target: "camgrid.refresh", mode = %self.inner.mode, "auto_refresh_stopped");
        }
    }

    /// 切换启用状态，返回切换后的状态。
    pub fn toggle(&self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }

    /// 立即执行一个周期（定时器之外）。未启用时跳过。
    pub async fn trigger_now(&self) -> CycleOutcome {
        let liveness = self.state().liveness.clone();
        match liveness {
            Some(token) => self.inner.run_cycle(&token).await,
            None => {
                record_reconcile_skipped();
                debug!(target: "camgrid.refresh", reason = "disabled", "reconcile_cycle_skipped");
                CycleOutcome::Skipped(SkipReason::Disabled)
            }
        }
    }

    /// 终止：停用且不可再启用。
    pub fn shutdown(&self) {
        let mut state = self.state();
        stop(&mut state);
        if !state.torn_down {
            state.torn_down = true;
            info!(target: "camgrid.refresh", mode = %self.inner.mode, "auto_refresh_shutdown");
        }
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        stop(&mut self.state());
    }
}

fn stop(state: &mut TaskState) -> bool {
    let Some(liveness) = state.liveness.take() else {
        return false;
    };
    liveness.store(false, Ordering::SeqCst);
    if let Some(task) = state.task.take() {
        task.abort();
    }
    true
}

impl ReconcilerInner {
    async fn run_cycle(&self, liveness: &AtomicBool) -> CycleOutcome {
        if !liveness.load(Ordering::SeqCst) {
            record_reconcile_skipped();
            return CycleOutcome::Skipped(SkipReason::Disabled);
        }
        let visible = VisibleSet::collect(&self.view.rendered_nodes());
        if visible.is_empty() {
            record_reconcile_skipped();
            debug!(target: "camgrid.refresh", reason = "nothing_visible", "reconcile_cycle_skipped");
            return CycleOutcome::Skipped(SkipReason::NothingVisible);
        }

        let status_filter = self
            .status_filter
            .read()
            .map(|statuses| statuses.clone())
            .unwrap_or_default();
        let fetched = tokio::try_join!(
            self.fetch_members(EntityKind::Location, &visible.locations, &status_filter),
            self.fetch_members(EntityKind::Bridge, &visible.bridges, &status_filter),
            self.fetch_members(EntityKind::Camera, &visible.cameras, &status_filter),
        );
        let (locations, bridges, cameras) = match fetched {
            Ok(results) => results,
            Err(err) => {
                record_reconcile_failed();
                warn!(
                    target: "camgrid.refresh",
                    mode = %self.mode,
                    visible = visible.len(),
                    error = %err,
                    "reconcile_cycle_failed"
                );
                return CycleOutcome::Failed(err.to_string());
            }
        };
        let fetches = [&visible.locations, &visible.bridges, &visible.cameras]
            .iter()
            .filter(|ids| !ids.is_empty())
            .count();

        let patches = self.build_patches(locations.into_iter().chain(bridges).chain(cameras));
        let mut rows_updated = 0;
        for patch in &patches {
            if !liveness.load(Ordering::SeqCst) {
                record_reconcile_skipped();
                debug!(target: "camgrid.refresh", reason = "discarded", "reconcile_cycle_skipped");
                return CycleOutcome::Skipped(SkipReason::Discarded);
            }
            rows_updated += self.view.apply_patch(patch);
        }
        record_patches_applied(patches.len() as u64);
        record_reconcile_cycle();

        let report = CycleReport {
            visible: visible.len(),
            fetches,
            patches: patches.len(),
            rows_updated,
        };
        info!(
            target: "camgrid.refresh",
            mode = %self.mode,
            visible = report.visible,
            fetches = report.fetches,
            patches = report.patches,
            rows_updated = report.rows_updated,
            "reconcile_cycle_completed"
        );
        CycleOutcome::Completed(report)
    }

    async fn fetch_members(
        &self,
        kind: EntityKind,
        ids: &BTreeSet<String>,
        status_filter: &[EntityStatus],
    ) -> Result<Vec<Entity>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = EntityFilter::new()
            .with_id_in(ids.iter().cloned())
            .with_status_in(status_filter.iter().copied());
        let request = PageRequest::new(kind, filter, ids.len());
        match self.fetcher.fetch_page(request).await {
            Ok(page) => {
                record_page_fetched();
                Ok(page.results)
            }
            Err(err) => {
                record_fetch_failure();
                Err(err)
            }
        }
    }

    /// 按实体在当前模式下的所在路径分组；模式中不存在的种类被忽略。
    fn build_patches(&self, entities: impl Iterator<Item = Entity>) -> Vec<RoutePatch> {
        let mut batches: BTreeMap<HierarchyPath, Vec<RowRecord>> = BTreeMap::new();
        for entity in entities {
            let Some(route) = self.mode.route_of(&entity) else {
                continue;
            };
            let row = if self.mode.is_leaf_depth(route.depth()) {
                RowRecord::leaf(&entity)
            } else {
                RowRecord::group(&entity)
            };
            batches.entry(route).or_default().push(row);
        }
        batches
            .into_iter()
            .map(|(route, rows)| RoutePatch { route, rows })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Bridge, Camera};

    fn node(route: &[&str], row: RowRecord, expanded: bool) -> RenderedNode {
        RenderedNode {
            route: route.iter().copied().collect(),
            row,
            expanded,
        }
    }

    #[test]
    fn visible_set_takes_leaves_and_expanded_groups() {
        let bridge = |id: &str| {
            RowRecord::group(&Entity::Bridge(Bridge {
                id: id.to_string(),
                location_id: "L1".to_string(),
                status: EntityStatus::Online,
            }))
        };
        let camera = RowRecord::leaf(&Entity::Camera(Camera {
            id: "C42".to_string(),
            location_id: "L1".to_string(),
            bridge_id: "B1".to_string(),
            status: EntityStatus::Online,
        }));
        let nodes = vec![
            node(&[], bridge("B1"), true),
            node(&[], bridge("B2"), false),
            node(&["B1"], camera, false),
        ];
        let set = VisibleSet::collect(&nodes);
        assert!(set.locations.is_empty());
        assert_eq!(set.bridges.iter().collect::<Vec<_>>(), vec!["B1"]);
        assert_eq!(set.cameras.iter().collect::<Vec<_>>(), vec!["C42"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_view_yields_empty_set() {
        assert!(VisibleSet::collect(&[]).is_empty());
    }
}
