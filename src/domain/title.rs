use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    CheckinError, CheckoutError, CoverRef, CoverRejected, InvalidTitleInput, Isbn, QuantityError,
    TitleId,
};

/// 表紙画像の最大サイズ（5 MiB）
pub const MAX_COVER_BYTES: usize = 5 * 1024 * 1024;

/// 表紙画像として受け付ける拡張子
pub const ALLOWED_COVER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Title集約 - 1つの書誌と、その所蔵数・貸出可能数
///
/// 不変条件：
/// - `total_copies >= 1`
/// - `0 <= available_copies <= total_copies`
///
/// フィールドは公開しているが、値の変更は本モジュールの純粋関数を経由する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: TitleId,
    pub isbn: Isbn,
    pub author: String,
    pub title: String,
    pub publication_year: i32,
    pub total_copies: u32,
    pub available_copies: u32,
    pub cover_image: Option<CoverRef>,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Title {
    /// 貸出中の冊数（所蔵数 - 貸出可能数）
    pub fn outstanding_copies(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    /// 不変条件を満たしているか
    pub fn is_consistent(&self) -> bool {
        self.total_copies >= 1 && self.available_copies <= self.total_copies
    }
}

/// 新規タイトルの入力値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTitle {
    pub isbn: Isbn,
    pub author: String,
    pub title: String,
    pub publication_year: i32,
    pub total_copies: u32,
}

/// 書誌情報の部分更新
///
/// 貸出可能数は含めない。所蔵数は`reconcile_quantity`で別途扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleDetails {
    pub author: Option<String>,
    pub title: Option<String>,
    pub publication_year: Option<i32>,
}

fn non_empty(value: &str, err: InvalidTitleInput) -> Result<String, InvalidTitleInput> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

/// 純粋関数：タイトルを登録する
///
/// ビジネスルール：
/// - 著者名・書名は空不可
/// - 所蔵数は1以上
/// - 登録時は全冊が貸出可能
pub fn register_title(
    input: NewTitle,
    cover_image: Option<CoverRef>,
    registered_at: DateTime<Utc>,
) -> Result<Title, InvalidTitleInput> {
    let author = non_empty(&input.author, InvalidTitleInput::EmptyAuthor)?;
    let title = non_empty(&input.title, InvalidTitleInput::EmptyTitle)?;

    if input.total_copies < 1 {
        return Err(InvalidTitleInput::TotalCopiesBelowMinimum(
            input.total_copies,
        ));
    }

    Ok(Title {
        id: TitleId::new(),
        isbn: input.isbn,
        author,
        title,
        publication_year: input.publication_year,
        total_copies: input.total_copies,
        available_copies: input.total_copies,
        cover_image,
        created_at: registered_at,
        updated_at: registered_at,
    })
}

/// 純粋関数：1冊を払い出す（貸出）
///
/// 貸出可能数が0の場合は`CheckoutError::NoCopiesAvailable`。
pub fn checkout_copy(title: &Title, at: DateTime<Utc>) -> Result<Title, CheckoutError> {
    if title.available_copies == 0 {
        return Err(CheckoutError::NoCopiesAvailable);
    }

    Ok(Title {
        available_copies: title.available_copies - 1,
        updated_at: at,
        ..title.clone()
    })
}

/// 純粋関数：1冊を戻し入れる（返却）
///
/// 全冊が貸出可能なのに返却された場合は在庫データが既に壊れている。
/// 値を丸めずに`CheckinError::NoOutstandingCopies`を返す。
pub fn checkin_copy(title: &Title, at: DateTime<Utc>) -> Result<Title, CheckinError> {
    if title.available_copies >= title.total_copies {
        return Err(CheckinError::NoOutstandingCopies {
            total_copies: title.total_copies,
            available_copies: title.available_copies,
        });
    }

    Ok(Title {
        available_copies: title.available_copies + 1,
        updated_at: at,
        ..title.clone()
    })
}

/// 純粋関数：所蔵数を変更する
///
/// ビジネスルール：
/// - 現在の値から貸出中の冊数を求める（outstanding = total - available）
/// - 新しい所蔵数は1以上かつoutstanding以上
/// - 貸出可能数は new_total - outstanding として再計算する（上書きしない）
pub fn reconcile_quantity(
    title: &Title,
    new_total: u32,
    at: DateTime<Utc>,
) -> Result<Title, QuantityError> {
    if new_total < 1 {
        return Err(QuantityError::BelowMinimum(new_total));
    }

    let outstanding = title.outstanding_copies();
    if new_total < outstanding {
        return Err(QuantityError::BelowOutstanding {
            requested: new_total,
            outstanding,
        });
    }

    Ok(Title {
        total_copies: new_total,
        available_copies: new_total - outstanding,
        updated_at: at,
        ..title.clone()
    })
}

/// 純粋関数：書誌情報を部分更新する
///
/// 指定されたフィールドのみを検証して反映する。
pub fn apply_details(
    title: &Title,
    details: &TitleDetails,
    at: DateTime<Utc>,
) -> Result<Title, InvalidTitleInput> {
    let author = match &details.author {
        Some(author) => non_empty(author, InvalidTitleInput::EmptyAuthor)?,
        None => title.author.clone(),
    };
    let name = match &details.title {
        Some(name) => non_empty(name, InvalidTitleInput::EmptyTitle)?,
        None => title.title.clone(),
    };

    Ok(Title {
        author,
        title: name,
        publication_year: details.publication_year.unwrap_or(title.publication_year),
        updated_at: at,
        ..title.clone()
    })
}

/// 純粋関数：表紙画像を検証する
///
/// 正規化した（小文字・先頭のドットなし）拡張子を返す。
pub fn validate_cover(size: usize, extension: &str) -> Result<String, CoverRejected> {
    if size == 0 {
        return Err(CoverRejected::Empty);
    }
    if size > MAX_COVER_BYTES {
        return Err(CoverRejected::TooLarge {
            size,
            max: MAX_COVER_BYTES,
        });
    }

    let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if !ALLOWED_COVER_EXTENSIONS.contains(&normalized.as_str()) {
        return Err(CoverRejected::UnsupportedExtension(extension.to_string()));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_title(total_copies: u32) -> NewTitle {
        NewTitle {
            isbn: Isbn::parse("9784065199817").unwrap(),
            author: "Ursula K. Le Guin".to_string(),
            title: "The Dispossessed".to_string(),
            publication_year: 1974,
            total_copies,
        }
    }

    fn title_with(total: u32, available: u32) -> Title {
        Title {
            total_copies: total,
            available_copies: available,
            ..register_title(new_title(total), None, Utc::now()).unwrap()
        }
    }

    #[test]
    fn test_register_title_makes_all_copies_available() {
        let now = Utc::now();
        let title = register_title(new_title(3), None, now).unwrap();

        assert_eq!(title.total_copies, 3);
        assert_eq!(title.available_copies, 3);
        assert_eq!(title.created_at, now);
        assert!(title.is_consistent());
    }

    #[test]
    fn test_register_title_trims_names() {
        let input = NewTitle {
            author: "  Le Guin ".to_string(),
            ..new_title(1)
        };
        let title = register_title(input, None, Utc::now()).unwrap();
        assert_eq!(title.author, "Le Guin");
    }

    #[test]
    fn test_register_title_rejects_zero_copies() {
        let result = register_title(new_title(0), None, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            InvalidTitleInput::TotalCopiesBelowMinimum(0)
        );
    }

    #[test]
    fn test_register_title_rejects_blank_author() {
        let input = NewTitle {
            author: "   ".to_string(),
            ..new_title(1)
        };
        let result = register_title(input, None, Utc::now());
        assert_eq!(result.unwrap_err(), InvalidTitleInput::EmptyAuthor);
    }

    #[test]
    fn test_checkout_copy_decrements_available() {
        let title = title_with(2, 2);
        let updated = checkout_copy(&title, Utc::now()).unwrap();
        assert_eq!(updated.available_copies, 1);
        assert_eq!(updated.total_copies, 2);
    }

    #[test]
    fn test_checkout_copy_fails_when_none_available() {
        let title = title_with(1, 0);
        let result = checkout_copy(&title, Utc::now());
        assert_eq!(result.unwrap_err(), CheckoutError::NoCopiesAvailable);
    }

    #[test]
    fn test_checkin_copy_increments_available() {
        let title = title_with(2, 1);
        let updated = checkin_copy(&title, Utc::now()).unwrap();
        assert_eq!(updated.available_copies, 2);
    }

    #[test]
    fn test_checkin_copy_detects_missing_deficit() {
        let title = title_with(2, 2);
        let result = checkin_copy(&title, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            CheckinError::NoOutstandingCopies {
                total_copies: 2,
                available_copies: 2,
            }
        );
    }

    #[test]
    fn test_reconcile_quantity_rejects_below_outstanding() {
        // 10冊中8冊貸出中
        let title = title_with(10, 2);
        let result = reconcile_quantity(&title, 3, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            QuantityError::BelowOutstanding {
                requested: 3,
                outstanding: 8,
            }
        );
    }

    #[test]
    fn test_reconcile_quantity_shrinks_above_outstanding() {
        // 10冊中2冊貸出中
        let title = title_with(10, 8);
        let updated = reconcile_quantity(&title, 3, Utc::now()).unwrap();
        assert_eq!(updated.total_copies, 3);
        assert_eq!(updated.available_copies, 1);
    }

    #[test]
    fn test_reconcile_quantity_recomputes_available() {
        let title = title_with(10, 8);
        let updated = reconcile_quantity(&title, 12, Utc::now()).unwrap();
        assert_eq!(updated.total_copies, 12);
        assert_eq!(updated.available_copies, 10);
    }

    #[test]
    fn test_reconcile_quantity_allows_exactly_outstanding() {
        let title = title_with(5, 2);
        let updated = reconcile_quantity(&title, 3, Utc::now()).unwrap();
        assert_eq!(updated.total_copies, 3);
        assert_eq!(updated.available_copies, 0);
    }

    #[test]
    fn test_reconcile_quantity_rejects_zero() {
        let title = title_with(5, 5);
        let result = reconcile_quantity(&title, 0, Utc::now());
        assert_eq!(result.unwrap_err(), QuantityError::BelowMinimum(0));
    }

    #[test]
    fn test_apply_details_keeps_counts() {
        let title = title_with(4, 1);
        let details = TitleDetails {
            title: Some("The Left Hand of Darkness".to_string()),
            ..Default::default()
        };
        let updated = apply_details(&title, &details, Utc::now()).unwrap();

        assert_eq!(updated.title, "The Left Hand of Darkness");
        assert_eq!(updated.author, title.author);
        assert_eq!(updated.total_copies, 4);
        assert_eq!(updated.available_copies, 1);
    }

    #[test]
    fn test_apply_details_rejects_empty_title() {
        let title = title_with(1, 1);
        let details = TitleDetails {
            title: Some(String::new()),
            ..Default::default()
        };
        let result = apply_details(&title, &details, Utc::now());
        assert_eq!(result.unwrap_err(), InvalidTitleInput::EmptyTitle);
    }

    #[test]
    fn test_validate_cover_normalizes_extension() {
        assert_eq!(validate_cover(10, ".PNG").unwrap(), "png");
    }

    #[test]
    fn test_validate_cover_rejects_unknown_extension() {
        let result = validate_cover(10, "gif");
        assert!(matches!(result, Err(CoverRejected::UnsupportedExtension(_))));
    }

    #[test]
    fn test_validate_cover_rejects_oversize_and_empty() {
        assert!(matches!(
            validate_cover(MAX_COVER_BYTES + 1, "jpg"),
            Err(CoverRejected::TooLarge { .. })
        ));
        assert_eq!(validate_cover(0, "jpg").unwrap_err(), CoverRejected::Empty);
    }
}
