use crate::domain::{
    BorrowerId, TitleId,
    catalog::{Pagination, TitleFilter, TitlePage},
    loan::Loan,
};

use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};

/// タイトル一覧を取得する（読み取り専用、ロックなし）
///
/// 書名・著者名の部分一致（大文字小文字を区別しない）で絞り込み、
/// 1始まりのページ番号で分割する。総ページ数は ceil(総件数 / 件数上限)。
/// ページ間の整合性は保証しない。
pub async fn list_titles(
    deps: &ServiceDependencies,
    filter: TitleFilter,
    page: u32,
    limit: u32,
) -> Result<TitlePage> {
    let pagination = Pagination::new(page, limit)?;
    let filter = filter.normalized();

    let (items, total) = deps
        .title_store
        .search(&filter, pagination)
        .await
        .map_err(ApplicationError::StoreError)?;

    tracing::debug!(
        total,
        page = pagination.page(),
        returned = items.len(),
        "Listed titles"
    );

    Ok(TitlePage {
        items,
        total,
        page: pagination.page(),
        total_pages: pagination.total_pages(total),
    })
}

/// 全貸出履歴を取得する（管理用）
pub async fn list_loan_history(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_store
        .list_history()
        .await
        .map_err(ApplicationError::StoreError)
}

/// 借り手の貸出履歴を取得する
pub async fn list_loans_for_borrower(
    deps: &ServiceDependencies,
    borrower_id: BorrowerId,
) -> Result<Vec<Loan>> {
    deps.loan_store
        .find_by_borrower(borrower_id)
        .await
        .map_err(ApplicationError::StoreError)
}

/// タイトルの貸出中の記録を取得する（在庫監査用）
///
/// 件数は 所蔵数 - 貸出可能数 と一致するはず。
pub async fn list_open_loans_for_title(
    deps: &ServiceDependencies,
    title_id: TitleId,
) -> Result<Vec<Loan>> {
    deps.loan_store
        .find_open_by_title(title_id)
        .await
        .map_err(ApplicationError::StoreError)
}
