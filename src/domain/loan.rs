use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BorrowerId, CloseLoanError, LoanId, TitleId};

/// 貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// 貸出中
    Open,
    /// 返却済み
    Returned,
}

/// Loan - 1人の借り手が1冊を借りた記録
///
/// `returned_at`が`None`の間は貸出中。
/// 返却後は履歴として残り、再開・削除されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub title_id: TitleId,
    pub borrower_id: BorrowerId,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    pub fn status(&self) -> LoanStatus {
        if self.is_open() {
            LoanStatus::Open
        } else {
            LoanStatus::Returned
        }
    }
}

/// 純粋関数：貸出記録を開く
pub fn open_loan(title_id: TitleId, borrower_id: BorrowerId, borrowed_at: DateTime<Utc>) -> Loan {
    Loan {
        id: LoanId::new(),
        title_id,
        borrower_id,
        borrowed_at,
        returned_at: None,
    }
}

/// 純粋関数：貸出記録を閉じる
///
/// 既に返却済みの記録は変更しない。
pub fn close_loan(loan: &Loan, returned_at: DateTime<Utc>) -> Result<Loan, CloseLoanError> {
    if !loan.is_open() {
        return Err(CloseLoanError::AlreadyReturned);
    }

    Ok(Loan {
        returned_at: Some(returned_at),
        ..loan.clone()
    })
}
