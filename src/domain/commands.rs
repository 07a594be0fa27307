use chrono::{DateTime, Utc};

use super::{BorrowerId, TitleId};

/// 表紙画像のアップロード内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverUpload {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// コマンド：タイトルを登録する
///
/// ISBNは文字列のまま受け取り、アプリケーション層で検証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTitle {
    pub isbn: String,
    pub author: String,
    pub title: String,
    pub publication_year: i32,
    pub total_copies: u32,
    pub cover: Option<CoverUpload>,
    pub created_at: DateTime<Utc>,
}

/// コマンド：所蔵数を変更する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuantity {
    pub title_id: TitleId,
    pub new_total: u32,
    pub updated_at: DateTime<Utc>,
}

/// コマンド：書誌情報を部分更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTitle {
    pub title_id: TitleId,
    pub author: Option<String>,
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub total_copies: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

/// コマンド：タイトルを借りる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowTitle {
    pub title_id: TitleId,
    pub borrower_id: BorrowerId,
    pub borrowed_at: DateTime<Utc>,
}

/// コマンド：タイトルを返す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTitle {
    pub title_id: TitleId,
    pub borrower_id: BorrowerId,
    pub returned_at: DateTime<Utc>,
}
