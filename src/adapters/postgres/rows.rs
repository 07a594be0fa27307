use crate::domain::{BorrowerId, CoverRef, Isbn, LoanId, TitleId, loan::Loan, title::Title};
use crate::ports::Result;
use sqlx::{Row, postgres::PgRow};

pub(super) const TITLE_COLUMNS: &str = r#"
    id,
    isbn,
    author,
    title,
    publication_year,
    total_copies,
    available_copies,
    cover_image,
    created_at,
    updated_at
"#;

pub(super) const LOAN_COLUMNS: &str = r#"
    id,
    title_id,
    borrower_id,
    borrowed_at,
    returned_at
"#;

fn count_from_db(column: &str, value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{column} out of range: {value}"),
        )) as Box<dyn std::error::Error + Send + Sync>
    })
}

/// 在庫数をINTEGER列に変換する
pub(super) fn count_to_db(value: u32) -> Result<i32> {
    Ok(i32::try_from(value)?)
}

/// PostgreSQLの行データをTitleに変換する
///
/// 件数列のi32からu32への変換と、ISBNの再検証でエラーハンドリングを行う。
pub(super) fn map_row_to_title(row: &PgRow) -> Result<Title> {
    let isbn_str: String = row.try_get("isbn")?;
    let isbn = Isbn::parse(&isbn_str)?;
    let cover_image: Option<String> = row.try_get("cover_image")?;

    Ok(Title {
        id: TitleId::from_uuid(row.try_get("id")?),
        isbn,
        author: row.try_get("author")?,
        title: row.try_get("title")?,
        publication_year: row.try_get("publication_year")?,
        total_copies: count_from_db("total_copies", row.try_get("total_copies")?)?,
        available_copies: count_from_db("available_copies", row.try_get("available_copies")?)?,
        cover_image: cover_image.map(CoverRef::new),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQLの行データをLoanに変換する
pub(super) fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    Ok(Loan {
        id: LoanId::from_uuid(row.try_get("id")?),
        title_id: TitleId::from_uuid(row.try_get("title_id")?),
        borrower_id: BorrowerId::from_uuid(row.try_get("borrower_id")?),
        borrowed_at: row.try_get("borrowed_at")?,
        returned_at: row.try_get("returned_at")?,
    })
}

/// ILIKE用の部分一致パターンを作る
///
/// 入力中の`%`と`_`はワイルドカードではなく文字として扱う。
pub(super) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
