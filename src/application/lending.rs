use crate::domain::{
    self, CheckinError, CheckoutError,
    commands::{BorrowTitle, ReturnTitle},
    loan::Loan,
};
use crate::ports::LendingTransaction;

use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};
use super::transaction::finish;

/// タイトルを借りる
///
/// ビジネスルール（この順で判定する）：
/// 1. タイトルが存在すること（NotFound）
/// 2. 貸出可能な冊数が1以上であること（InvalidState）
/// 3. 同じ借り手の貸出中の記録がないこと（Conflict）
///
/// # 一貫性保証
///
/// 判定と書き込み（在庫数の減算・貸出記録の追加）はすべて1つのトランザクション内で、
/// タイトル行の排他ロックを保持したまま行う。最後の1冊を同時に借りようとした場合、
/// 後続の呼び出しは先行トランザクションの終了を待ってから在庫0を観測する。
pub async fn borrow_title(deps: &ServiceDependencies, cmd: BorrowTitle) -> Result<Loan> {
    let mut tx = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    let result = borrow_locked(tx.as_mut(), &cmd).await;
    let loan = finish(tx, result).await?;

    tracing::info!(
        loan_id = %loan.id.value(),
        title_id = %cmd.title_id.value(),
        borrower_id = %cmd.borrower_id.value(),
        "Title borrowed"
    );
    Ok(loan)
}

async fn borrow_locked(tx: &mut dyn LendingTransaction, cmd: &BorrowTitle) -> Result<Loan> {
    // 1. タイトル行をロック
    let title = tx
        .lock_title(cmd.title_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::TitleNotFound)?;

    // 2. 在庫確認
    let updated_title = domain::title::checkout_copy(&title, cmd.borrowed_at).map_err(
        |err| match err {
            CheckoutError::NoCopiesAvailable => ApplicationError::NoCopiesAvailable,
        },
    )?;

    // 3. 二重貸出の確認
    let existing = tx
        .find_open_loan(cmd.title_id, cmd.borrower_id)
        .await
        .map_err(ApplicationError::StoreError)?;
    if existing.is_some() {
        return Err(ApplicationError::AlreadyBorrowed);
    }

    // 4. 書き込み
    let loan = domain::loan::open_loan(cmd.title_id, cmd.borrower_id, cmd.borrowed_at);
    tx.save_title(&updated_title)
        .await
        .map_err(ApplicationError::StoreError)?;
    tx.insert_loan(&loan)
        .await
        .map_err(ApplicationError::StoreError)?;

    Ok(loan)
}

/// タイトルを返す
///
/// ビジネスルール（この順で判定する）：
/// 1. タイトルが存在すること（NotFound）
/// 2. 同じ借り手の貸出中の記録があること（NotFound）
/// 3. 返却前に 貸出可能数 < 所蔵数 であること
///
/// 3に違反する場合は在庫データが既に壊れている。値を丸めて修復せず、
/// エラーログを出して内部エラーとして返す。
///
/// # 一貫性保証
///
/// `borrow_title()`と同じく、タイトル行の排他ロック下で1トランザクションとして実行する。
pub async fn return_title(deps: &ServiceDependencies, cmd: ReturnTitle) -> Result<Loan> {
    let mut tx = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    let result = return_locked(tx.as_mut(), &cmd).await;
    let loan = finish(tx, result).await?;

    tracing::info!(
        loan_id = %loan.id.value(),
        title_id = %cmd.title_id.value(),
        borrower_id = %cmd.borrower_id.value(),
        "Title returned"
    );
    Ok(loan)
}

async fn return_locked(tx: &mut dyn LendingTransaction, cmd: &ReturnTitle) -> Result<Loan> {
    // 1. タイトル行をロック
    let title = tx
        .lock_title(cmd.title_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::TitleNotFound)?;

    // 2. 貸出中の記録を取得
    let open_loan = tx
        .find_open_loan(cmd.title_id, cmd.borrower_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::ActiveLoanNotFound)?;

    // 3. 在庫の戻し入れ（破損検出）
    let updated_title = domain::title::checkin_copy(&title, cmd.returned_at).map_err(|err| {
        let CheckinError::NoOutstandingCopies {
            total_copies,
            available_copies,
        } = err;
        tracing::error!(
            title_id = %cmd.title_id.value(),
            loan_id = %open_loan.id.value(),
            total_copies,
            available_copies,
            "Open loan found but no copies are outstanding; inventory is corrupted"
        );
        ApplicationError::InventoryCorrupted {
            title_id: cmd.title_id,
            total_copies,
            available_copies,
        }
    })?;

    // find_open_loanは貸出中の記録のみを返すため、ここでは失敗しない
    let closed_loan = domain::loan::close_loan(&open_loan, cmd.returned_at)
        .map_err(|_| ApplicationError::ActiveLoanNotFound)?;

    // 4. 書き込み
    tx.save_title(&updated_title)
        .await
        .map_err(ApplicationError::StoreError)?;
    tx.save_loan(&closed_loan)
        .await
        .map_err(ApplicationError::StoreError)?;

    Ok(closed_loan)
}
