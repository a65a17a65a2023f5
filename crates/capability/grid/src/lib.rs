//! # Camgrid Grid 模块
//!
//! 层级网格的懒加载分页核心：
//!
//! - [`token_cache`]：节点级游标缓存与翻页方向推断
//! - [`row_source`]：按节点路径与行窗口拉取并映射行记录
//! - [`view`]：渲染面接口与内存视图模型
//! - [`reconciler`]：只刷新已渲染节点的定时任务
//! - [`session`]：把以上组件绑定到一个视图的生命周期
//!
//! 数据只通过 `camgrid_storage::PageFetcher` 读取，不做任何写入。

pub mod error;
pub mod reconciler;
pub mod row_source;
pub mod session;
pub mod token_cache;
pub mod view;

pub use error::GridError;
pub use reconciler::{
    CycleOutcome, CycleReport, DEFAULT_REFRESH_INTERVAL, Reconciler, SkipReason, VisibleSet,
};
pub use row_source::{RowBlock, RowSource};
pub use session::{GridSession, RefreshSettings};
pub use token_cache::{CacheEntry, Direction, Resolution, TokenCache, infer_direction};
pub use view::{GridView, InMemoryGridView, RenderedNode, RouteData, RoutePatch, ViewSnapshot};
