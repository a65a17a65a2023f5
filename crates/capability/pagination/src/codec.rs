//! 分页游标编解码
//!
//! 游标格式：`base64(JSON{"offset": n, "filters": {...}})`，标准字母表。
//! 对调用方而言游标是不透明字符串，除 offset 相等外不定义任何比较语义。

use crate::error::PaginationError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use domain::EntityFilter;
use serde::{Deserialize, Serialize};

/// 游标载荷：绝对偏移 + 产生该游标的过滤指纹。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageToken {
    pub offset: usize,
    pub filters: EntityFilter,
}

impl PageToken {
    pub fn new(offset: usize, filters: EntityFilter) -> Self {
        Self { offset, filters }
    }

    pub fn encode(&self) -> String {
        // PageToken 只含字符串、整数与枚举，序列化不会失败
        let json = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(json)
    }
}

/// 编码游标。
pub fn encode_page_token(offset: usize, filters: &EntityFilter) -> String {
    PageToken::new(offset, filters.clone()).encode()
}

/// 解码游标；非 base64 或非合法载荷时返回 `InvalidCursor`。
pub fn decode_page_token(token: &str) -> Result<PageToken, PaginationError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|err| PaginationError::InvalidCursor(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| PaginationError::InvalidCursor(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::EntityStatus;

    #[test]
    fn token_round_trips_with_fingerprint() {
        let filters = EntityFilter::new()
            .with_bridge("Bridge-1")
            .with_status_in([EntityStatus::Online, EntityStatus::Error]);
        let token = encode_page_token(200, &filters);
        let decoded = decode_page_token(&token).expect("decode");
        assert_eq!(decoded.offset, 200);
        assert_eq!(decoded.filters, filters);
    }

    #[test]
    fn token_is_transportable_text() {
        let token = encode_page_token(0, &EntityFilter::default());
        assert!(token.is_ascii());
        assert!(!token.contains(char::is_whitespace));
    }

    #[test]
    fn garbage_is_rejected() {
        for token in ["", "not base64!", "e30=", "bnVsbA==", "eyJvZmZzZXQiOi0xfQ=="] {
            let err = decode_page_token(token).expect_err(token);
            assert!(matches!(err, PaginationError::InvalidCursor(_)), "{token}");
        }
    }
}
