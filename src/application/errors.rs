use thiserror::Error;

use crate::domain::{
    CoverRejected, InvalidTitleInput, QuantityError, TitleId, catalog::PaginationError,
};

/// 呼び出し側に返すエラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 対象のタイトルまたは貸出が存在しない
    NotFound,
    /// 現在の在庫状態では実行できない
    InvalidState,
    /// 一意性の制約に違反する
    Conflict,
    /// 入力値が業務ルールに違反する
    InvalidInput,
    /// 起こり得ない状態の検出、またはインフラ障害
    Internal,
}

/// アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// タイトルが存在しない
    #[error("Title not found")]
    TitleNotFound,

    /// 貸出中の記録が存在しない
    #[error("No active loan")]
    ActiveLoanNotFound,

    /// 貸出可能な冊数がない
    #[error("No copies available")]
    NoCopiesAvailable,

    /// 同じ借り手が既に貸出中
    #[error("Already borrowed")]
    AlreadyBorrowed,

    /// ISBNの重複
    #[error("Title with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// 入力値のエラー
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 在庫データの破損（不足がないのに返却された）
    #[error(
        "Inventory corrupted for title {}: {available_copies} of {total_copies} copies already available",
        title_id.value()
    )]
    InventoryCorrupted {
        title_id: TitleId,
        total_copies: u32,
        available_copies: u32,
    },

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 表紙画像ストアのエラー
    #[error("Cover store error")]
    CoverStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::TitleNotFound | ApplicationError::ActiveLoanNotFound => {
                ErrorKind::NotFound
            }
            ApplicationError::NoCopiesAvailable => ErrorKind::InvalidState,
            ApplicationError::AlreadyBorrowed | ApplicationError::DuplicateIsbn(_) => {
                ErrorKind::Conflict
            }
            ApplicationError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApplicationError::InventoryCorrupted { .. }
            | ApplicationError::StoreError(_)
            | ApplicationError::CoverStoreError(_) => ErrorKind::Internal,
        }
    }
}

impl From<InvalidTitleInput> for ApplicationError {
    fn from(err: InvalidTitleInput) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<QuantityError> for ApplicationError {
    fn from(err: QuantityError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<CoverRejected> for ApplicationError {
    fn from(err: CoverRejected) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

impl From<PaginationError> for ApplicationError {
    fn from(err: PaginationError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;
