//! # 分页游标能力模块
//!
//! - [`codec`]：不透明分页游标（`{offset, filters}` → JSON → base64）的编解码
//! - [`paginate`]：后端侧按游标切片，生成 next/prev 游标与总数
//!
//! 游标只对产生它的过滤条件有意义：`paginate` 会校验游标中的过滤指纹，
//! 与当前请求不一致时返回 [`PaginationError::InvalidCursor`]。

pub mod codec;
pub mod error;
pub mod paginate;

pub use codec::{PageToken, decode_page_token, encode_page_token};
pub use error::PaginationError;
pub use paginate::{DEFAULT_PAGE_SIZE, Page, paginate};
