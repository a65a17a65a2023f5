//! 层级行数据源
//!
//! 对一个层级节点（祖先 id 路径）和行窗口 `[start_row, end_row)`：
//! 1. 按分组模式把 depth 映射到实体种类和祖先等值过滤
//! 2. 经节点级游标缓存决定发送的游标
//! 3. 调用分页拉取服务并回写返回的游标
//! 4. 非叶子层输出分组行，叶子层输出实体行
//!
//! 只有窗口覆盖到结果末尾时才报告总行数。

use crate::error::GridError;
use crate::token_cache::{Direction, TokenCache};
use camgrid_pagination::{decode_page_token, encode_page_token};
use camgrid_storage::{PageFetcher, PageRequest};
use camgrid_telemetry::{
    record_cursor_backward, record_cursor_forward, record_cursor_repeat, record_cursor_restart,
    record_cursor_synthesized, record_fetch_failure, record_fetch_latency_ms, record_page_fetched,
    record_rows_served,
};
use domain::{EntityFilter, EntityStatus, GroupingMode, HierarchyPath, RowRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// 一次行请求的结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBlock {
    pub row_data: Vec<RowRecord>,
    /// 窗口覆盖到结果末尾时为总行数，否则未知
    pub row_count: Option<usize>,
}

pub struct RowSource {
    mode: GroupingMode,
    fetcher: Arc<dyn PageFetcher>,
    cache: Arc<TokenCache>,
}

impl RowSource {
    pub fn new(mode: GroupingMode, fetcher: Arc<dyn PageFetcher>, cache: Arc<TokenCache>) -> Self {
        Self {
            mode,
            fetcher,
            cache,
        }
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// 读取 `path` 节点下 `[start_row, end_row)` 的行。
    ///
    /// `status_filter` 为空表示不过滤状态。同一节点的并发请求按到达顺序串行执行。
    pub async fn get_rows(
        &self,
        path: &HierarchyPath,
        start_row: usize,
        end_row: usize,
        status_filter: &[EntityStatus],
    ) -> Result<RowBlock, GridError> {
        let depth = path.depth();
        let unsupported = || GridError::UnsupportedDepth {
            mode: self.mode,
            depth,
        };
        let kind = self.mode.kind_at(depth).ok_or_else(unsupported)?;
        let ancestors = self.mode.ancestor_filter(path).ok_or_else(unsupported)?;

        if end_row <= start_row {
            debug!(target: "camgrid.grid", path = %path, start_row, end_row, "empty_row_window");
            return Ok(RowBlock::default());
        }

        let filter = EntityFilter::new()
            .with_status_in(status_filter.iter().copied())
            .merged(&ancestors)
            .scoped_to(kind);
        let page_size = end_row - start_row;
        let key = TokenCache::key_for(depth, path);

        let lock = self.cache.path_lock(&key);
        let _guard = lock.lock().await;

        let cursor = self.cursor_for(&key, start_row, &filter);
        let request = PageRequest::new(kind, filter, page_size).with_cursor(cursor);

        let started = Instant::now();
        let page = match self.fetcher.fetch_page(request).await {
            Ok(page) => page,
            Err(err) => {
                record_fetch_failure();
                warn!(
                    target: "camgrid.grid",
                    path = %path,
                    kind = %kind,
                    start_row,
                    end_row,
                    error = %err,
                    "rows_load_failed"
                );
                return Err(err.into());
            }
        };
        record_page_fetched();
        record_fetch_latency_ms(started.elapsed().as_millis() as u64);

        self.cache.record(
            &key,
            start_row,
            page.next_cursor.clone(),
            page.prev_cursor.clone(),
        );

        let leaf = self.mode.is_leaf_depth(depth);
        let row_data: Vec<RowRecord> = page
            .results
            .iter()
            .map(|entity| {
                if leaf {
                    RowRecord::leaf(entity)
                } else {
                    RowRecord::group(entity)
                }
            })
            .collect();
        let row_count = (end_row >= page.total_size).then_some(page.total_size);
        record_rows_served(row_data.len() as u64);
        debug!(
            target: "camgrid.grid",
            path = %path,
            kind = %kind,
            start_row,
            end_row,
            returned = row_data.len(),
            total = page.total_size,
            row_count = ?row_count,
            "rows_loaded"
        );
        Ok(RowBlock {
            row_data,
            row_count,
        })
    }

    /// 起始行为 0 时不发送游标；缓存游标的偏移或过滤指纹与本次请求不一致时按偏移重新生成。
    fn cursor_for(&self, key: &str, start_row: usize, filter: &EntityFilter) -> Option<String> {
        let resolution = self.cache.resolve(key, start_row);
        match resolution.direction {
            Direction::Restart => record_cursor_restart(),
            Direction::Forward => record_cursor_forward(),
            Direction::Backward => record_cursor_backward(),
            Direction::Repeat => record_cursor_repeat(),
        }
        if start_row == 0 {
            return None;
        }
        if let Some(cursor) = resolution.cursor {
            let aligned = decode_page_token(&cursor)
                .map(|token| token.offset == start_row && &token.filters == filter)
                .unwrap_or(false);
            if aligned {
                return Some(cursor);
            }
        }
        record_cursor_synthesized();
        debug!(
            target: "camgrid.grid",
            key = %key,
            start_row,
            direction = resolution.direction.as_str(),
            "cursor_synthesized"
        );
        Some(encode_page_token(start_row, filter))
    }
}
