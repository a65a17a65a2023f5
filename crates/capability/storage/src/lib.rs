//! # Camgrid Storage 模块
//!
//! 实体存储与分页拉取服务的抽象层，以及用于演示和测试的内存实现。
//!
//! ## 模块说明
//!
//! - [`traits`]：`EntityStore`（实体存储）与 `PageFetcher`（分页拉取契约）
//! - [`models`]：拉取请求、状态变更结果、统计
//! - [`error`]：`StorageError` / `FetchError`
//! - [`validation`]：id 与状态种类校验
//! - [`generator`]：确定性的演示数据生成
//! - [`in_memory`]：内存实现
//!
//! ## 分页契约
//!
//! - 同一种类的列表顺序稳定（插入顺序）
//! - 游标由 `camgrid_pagination` 编码，携带发出时的过滤指纹
//! - 指纹不一致的游标返回 `FetchError::InvalidCursor`
//!
//! ```rust,ignore
//! use camgrid_storage::{InMemoryEntityStore, InMemoryPageFetcher, PageFetcher, PageRequest, SeedConfig};
//! use domain::{EntityFilter, EntityKind};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryEntityStore::with_seed(SeedConfig::default()));
//! let fetcher = InMemoryPageFetcher::new(store);
//! let page = fetcher
//!     .fetch_page(PageRequest::new(EntityKind::Camera, EntityFilter::new(), 100))
//!     .await?;
//! ```

pub mod error;
pub mod generator;
pub mod in_memory;
pub mod models;
pub mod traits;
pub mod validation;

pub use error::*;
pub use generator::{SeedConfig, SeedData};
pub use in_memory::{InMemoryEntityStore, InMemoryPageFetcher};
pub use models::*;
pub use traits::*;
pub use validation::*;
