use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    TitleId,
    catalog::{TitleFilter, TitlePage},
    commands::{CreateTitle, UpdateQuantity, UpdateTitle},
    loan::{Loan, LoanStatus},
    title::Title,
};

/// タイトル登録リクエスト（POST /titles）
///
/// 表紙画像はこのAPIでは受け付けない。
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub isbn: String,
    pub author: String,
    pub title: String,
    pub publication_year: i32,
    pub total_copies: u32,
}

impl CreateTitleRequest {
    pub fn to_command(self, created_at: DateTime<Utc>) -> CreateTitle {
        CreateTitle {
            isbn: self.isbn,
            author: self.author,
            title: self.title,
            publication_year: self.publication_year,
            total_copies: self.total_copies,
            cover: None,
            created_at,
        }
    }
}

/// 書誌情報の部分更新リクエスト（PATCH /titles/:id）
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    pub author: Option<String>,
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub total_copies: Option<u32>,
}

impl UpdateTitleRequest {
    pub fn to_command(self, title_id: TitleId, updated_at: DateTime<Utc>) -> UpdateTitle {
        UpdateTitle {
            title_id,
            author: self.author,
            title: self.title,
            publication_year: self.publication_year,
            total_copies: self.total_copies,
            updated_at,
        }
    }
}

/// 所蔵数変更リクエスト（PUT /titles/:id/quantity）
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub total_copies: u32,
}

impl UpdateQuantityRequest {
    pub fn to_command(self, title_id: TitleId, updated_at: DateTime<Utc>) -> UpdateQuantity {
        UpdateQuantity {
            title_id,
            new_total: self.total_copies,
            updated_at,
        }
    }
}

/// 貸出・返却リクエスト
///
/// 借り手IDは上流の認証層で確認済みのものを受け取る。
#[derive(Debug, Deserialize)]
pub struct LendingRequest {
    pub borrower_id: Uuid,
}

/// タイトル一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListTitlesQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListTitlesQuery {
    pub fn filter(&self) -> TitleFilter {
        TitleFilter {
            title: self.title.clone(),
            author: self.author.clone(),
        }
    }
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// 借り手IDでフィルタリング
    pub borrower_id: Option<Uuid>,
}

/// タイトルレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct TitleResponse {
    pub id: Uuid,
    pub isbn: String,
    pub author: String,
    pub title: String,
    pub publication_year: i32,
    pub total_copies: u32,
    pub available_copies: u32,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            id: title.id.value(),
            isbn: title.isbn.to_string(),
            author: title.author,
            title: title.title,
            publication_year: title.publication_year,
            total_copies: title.total_copies,
            available_copies: title.available_copies,
            cover_image: title.cover_image.map(|c| c.as_str().to_string()),
            created_at: title.created_at,
            updated_at: title.updated_at,
        }
    }
}

/// タイトル一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct TitlePageResponse {
    pub items: Vec<TitleResponse>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

impl From<TitlePage> for TitlePageResponse {
    fn from(page: TitlePage) -> Self {
        Self {
            items: page.items.into_iter().map(TitleResponse::from).collect(),
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub title_id: Uuid,
    pub borrower_id: Uuid,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id.value(),
            title_id: loan.title_id.value(),
            borrower_id: loan.borrower_id.value(),
            borrowed_at: loan.borrowed_at,
            returned_at: loan.returned_at,
            status: loan.status(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
