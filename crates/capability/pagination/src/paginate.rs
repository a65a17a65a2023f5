//! 后端分页切片
//!
//! 输入为已过滤、保持存储插入顺序的完整结果集：
//! - `next_cursor` 存在 ⇔ `offset + page_size < total_size`
//! - `prev_cursor` 存在 ⇔ `offset > 0`，指向 `max(0, offset - page_size)`

use crate::codec::{decode_page_token, encode_page_token};
use crate::error::PaginationError;
use domain::EntityFilter;
use serde::{Deserialize, Serialize};

/// 未指定（或为 0）时的页大小。
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// 一页结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub total_size: usize,
}

/// 按游标切出一页。
///
/// `filters` 是当前请求的过滤指纹；游标携带的指纹与之不同则拒绝（快速失败）。
pub fn paginate<T>(
    all_results: Vec<T>,
    page_token: Option<&str>,
    page_size: usize,
    filters: &EntityFilter,
) -> Result<Page<T>, PaginationError> {
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };

    let offset = match page_token {
        Some(token) => {
            let decoded = decode_page_token(token)?;
            if &decoded.filters != filters {
                return Err(PaginationError::InvalidCursor(
                    "page token was issued for a different filter set".to_string(),
                ));
            }
            decoded.offset
        }
        None => 0,
    };

    let total_size = all_results.len();
    let results: Vec<T> = all_results
        .into_iter()
        .skip(offset)
        .take(page_size)
        .collect();
    let has_more = offset.saturating_add(page_size) < total_size;
    let has_previous = offset > 0;

    Ok(Page {
        results,
        next_cursor: has_more.then(|| encode_page_token(offset + page_size, filters)),
        prev_cursor: has_previous
            .then(|| encode_page_token(offset.saturating_sub(page_size), filters)),
        total_size,
    })
}
