use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InvalidTitleInput;

/// タイトルID - 在庫レコードの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleId(Uuid);

impl TitleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for TitleId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 借り手ID - 外部の認証コンテキストへの参照
///
/// 借り手の詳細はこのコンテキストでは扱わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorrowerId(Uuid);

impl BorrowerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BorrowerId {
    fn default() -> Self {
        Self::new()
    }
}

/// ISBN - タイトルの業務キー
///
/// 不変条件：ハイフンと空白を除いた10桁または13桁。
/// ISBN-10の末尾のみ`X`を許容する。正規化済みの文字列を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// 文字列からISBNを生成する
    ///
    /// # エラー
    /// 桁数や文字種が不正な場合は`InvalidTitleInput::MalformedIsbn`を返す
    pub fn parse(raw: &str) -> Result<Self, InvalidTitleInput> {
        let normalized: String = raw
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let valid = match normalized.len() {
            13 => normalized.chars().all(|c| c.is_ascii_digit()),
            10 => normalized.char_indices().all(|(i, c)| {
                c.is_ascii_digit() || (i == 9 && c == 'X')
            }),
            _ => false,
        };

        if !valid {
            return Err(InvalidTitleInput::MalformedIsbn(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = InvalidTitleInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表紙画像への参照（CoverStoreが返す不透明な値）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverRef(String);

impl CoverRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
