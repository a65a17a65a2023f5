//! 分页拉取服务的内存实现
//!
//! 以 `EntityStore` 为数据源，按请求种类收敛过滤条件后切页；
//! 可配置模拟延迟，用于观察网格懒加载行为。

use crate::error::FetchError;
use crate::models::PageRequest;
use crate::traits::{EntityStore, PageFetcher};
use async_trait::async_trait;
use camgrid_pagination::{Page, paginate};
use domain::Entity;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct InMemoryPageFetcher {
    store: Arc<dyn EntityStore>,
    latency: Duration,
}

impl InMemoryPageFetcher {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            latency: Duration::ZERO,
        }
    }

    /// 每次拉取前等待 `latency`。
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl PageFetcher for InMemoryPageFetcher {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Entity>, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        // 种类不支持的字段被忽略，收敛后的过滤条件即游标指纹
        let filter = request.filter.scoped_to(request.kind);
        let all = self.store.list_entities(request.kind, &filter).await?;
        let page = paginate(
            all,
            request.cursor.as_deref(),
            request.page_size,
            &filter,
        )?;
        debug!(
            target: "camgrid.storage",
            kind = %request.kind,
            returned = page.results.len(),
            total = page.total_size,
            has_next = page.next_cursor.is_some(),
            has_prev = page.prev_cursor.is_some(),
            "page_fetched"
        );
        Ok(page)
    }
}
