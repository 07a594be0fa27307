use thiserror::Error;

/// タイトル入力値のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTitleInput {
    /// ISBNの形式が不正
    #[error("malformed ISBN: {0:?}")]
    MalformedIsbn(String),
    /// 著者名が空
    #[error("author must not be empty")]
    EmptyAuthor,
    /// 書名が空
    #[error("title must not be empty")]
    EmptyTitle,
    /// 所蔵数が1未満
    #[error("total copies must be at least 1, got {0}")]
    TotalCopiesBelowMinimum(u32),
}

/// 貸出（在庫の払い出し）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// 貸出可能な冊数がない
    NoCopiesAvailable,
}

/// 返却（在庫の戻し入れ）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinError {
    /// 不足がないのに返却された（在庫データの破損）
    NoOutstandingCopies { total_copies: u32, available_copies: u32 },
}

/// 所蔵数変更のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// 所蔵数が1未満
    #[error("total copies must be at least 1, got {0}")]
    BelowMinimum(u32),
    /// 貸出中の冊数を下回る
    #[error(
        "would make outstanding loans exceed new total ({outstanding} outstanding, {requested} requested)"
    )]
    BelowOutstanding { requested: u32, outstanding: u32 },
}

/// 貸出記録の終了エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseLoanError {
    /// 既に返却済み
    AlreadyReturned,
}

/// 表紙画像の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverRejected {
    #[error("cover image is empty")]
    Empty,
    #[error("unsupported cover image extension: {0:?}")]
    UnsupportedExtension(String),
    #[error("cover image too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },
}
