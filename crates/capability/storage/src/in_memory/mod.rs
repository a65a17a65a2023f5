//! 内存存储实现（演示与测试）

mod entity;
mod fetcher;

pub use entity::InMemoryEntityStore;
pub use fetcher::InMemoryPageFetcher;
