//! 网格会话：一个视图对应一套 游标缓存 + 行数据源 + 视图模型 + 刷新器。
//!
//! 创建即激活（按配置启用刷新），`teardown` 为终止状态。
//! 切换分组模式时整体重建，旧缓存与旧视图随之丢弃。

use crate::error::GridError;
use crate::reconciler::{CycleOutcome, Reconciler};
use crate::row_source::{RowBlock, RowSource};
use crate::token_cache::TokenCache;
use crate::view::{GridView, InMemoryGridView};
use camgrid_storage::PageFetcher;
use domain::{EntityStatus, GroupingMode, HierarchyPath};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 刷新设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub auto_refresh: bool,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: crate::reconciler::DEFAULT_REFRESH_INTERVAL,
            auto_refresh: true,
        }
    }
}

pub struct GridSession {
    mode: GroupingMode,
    fetcher: Arc<dyn PageFetcher>,
    settings: RefreshSettings,
    cache: Arc<TokenCache>,
    view: Arc<InMemoryGridView>,
    row_source: RowSource,
    reconciler: Reconciler,
}

impl GridSession {
    /// 创建并激活会话。需要在 tokio 运行时内调用。
    pub fn new(
        mode: GroupingMode,
        fetcher: Arc<dyn PageFetcher>,
        settings: RefreshSettings,
    ) -> Self {
        let cache = Arc::new(TokenCache::new());
        let view = Arc::new(InMemoryGridView::new());
        let row_source = RowSource::new(mode, fetcher.clone(), cache.clone());
        let grid_view: Arc<dyn GridView> = view.clone();
        let reconciler = Reconciler::new(mode, fetcher.clone(), grid_view, settings.interval);
        if settings.auto_refresh {
            reconciler.enable();
        }
        info!(
            target: "camgrid.grid",
            mode = %mode,
            auto_refresh = settings.auto_refresh,
            "grid_session_created"
        );
        Self {
            mode,
            fetcher,
            settings,
            cache,
            view,
            row_source,
            reconciler,
        }
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    pub fn view(&self) -> &Arc<InMemoryGridView> {
        &self.view
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// 加载行并写入视图模型；失败时标记该路径加载失败。
    pub async fn load_rows(
        &self,
        route: &HierarchyPath,
        start_row: usize,
        end_row: usize,
        status_filter: &[EntityStatus],
    ) -> Result<RowBlock, GridError> {
        self.reconciler.set_status_filter(status_filter);
        match self
            .row_source
            .get_rows(route, start_row, end_row, status_filter)
            .await
        {
            Ok(block) => {
                self.view.record_rows(
                    route,
                    start_row,
                    block.row_data.clone(),
                    block.row_count,
                );
                Ok(block)
            }
            Err(err) => {
                self.view.record_failure(route);
                Err(err)
            }
        }
    }

    pub fn expand(&self, route: &HierarchyPath, id: &str) {
        self.view.expand(route, id);
    }

    pub fn collapse(&self, route: &HierarchyPath, id: &str) {
        self.view.collapse(route, id);
    }

    pub fn enable_refresh(&self) {
        self.reconciler.enable();
    }

    pub fn disable_refresh(&self) {
        self.reconciler.disable();
    }

    pub fn toggle_refresh(&self) -> bool {
        self.reconciler.toggle()
    }

    pub async fn refresh_now(&self) -> CycleOutcome {
        self.reconciler.trigger_now().await
    }

    /// 终止会话：刷新器进入不可恢复的停用状态。
    pub fn teardown(&self) {
        self.reconciler.shutdown();
        info!(target: "camgrid.grid", mode = %self.mode, "grid_session_torn_down");
    }

    /// 以新分组模式重建会话，沿用当前的刷新启用状态。
    pub fn rebuild(&self, mode: GroupingMode) -> GridSession {
        let settings = RefreshSettings {
            auto_refresh: self.reconciler.is_enabled(),
            ..self.settings
        };
        self.teardown();
        GridSession::new(mode, self.fetcher.clone(), settings)
    }
}
