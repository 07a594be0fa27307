use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::title::Title;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// ページ指定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be at least 1, got {0}")]
    PageBelowOne(u32),
    #[error("limit must be between 1 and 100, got {0}")]
    LimitOutOfRange(u32),
}

/// 1始まりのページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::PageBelowOne(page));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::LimitOutOfRange(limit));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// ceil(total / limit)
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

/// タイトル検索条件（大文字小文字を区別しない部分一致）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl TitleFilter {
    /// 空白のみの条件を取り除く
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            title: clean(self.title),
            author: clean(self.author),
        }
    }

    /// インメモリ実装向けの判定
    pub fn matches(&self, title: &Title) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| match needle {
            Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        contains(&title.title, &self.title) && contains(&title.author, &self.author)
    }
}

/// タイトル一覧の1ページ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePage {
    pub items: Vec<Title>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset() {
        let pagination = Pagination::new(3, 20).unwrap();
        assert_eq!(pagination.offset(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let pagination = Pagination::new(1, 10).unwrap();
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
    }

    #[test]
    fn test_pagination_rejects_out_of_range() {
        assert_eq!(
            Pagination::new(0, 10).unwrap_err(),
            PaginationError::PageBelowOne(0)
        );
        assert_eq!(
            Pagination::new(1, 0).unwrap_err(),
            PaginationError::LimitOutOfRange(0)
        );
        assert_eq!(
            Pagination::new(1, MAX_LIMIT + 1).unwrap_err(),
            PaginationError::LimitOutOfRange(MAX_LIMIT + 1)
        );
    }

    #[test]
    fn test_filter_normalized_drops_blank_terms() {
        let filter = TitleFilter {
            title: Some("  ".to_string()),
            author: Some(" tolkien ".to_string()),
        }
        .normalized();

        assert_eq!(filter.title, None);
        assert_eq!(filter.author.as_deref(), Some("tolkien"));
    }
}
