use crate::domain::{BorrowerId, TitleId, loan::Loan};
use async_trait::async_trait;

use super::Result;

/// 貸出レコードストアポート（読み取り専用）
///
/// 貸出記録の作成・終了は`LendingTransaction`を経由する。
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// 全貸出履歴を貸出日時の降順で返す
    async fn list_history(&self) -> Result<Vec<Loan>>;

    /// 借り手の貸出履歴を貸出日時の降順で返す
    async fn find_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Loan>>;

    /// タイトルの貸出中の記録を返す
    async fn find_open_by_title(&self, title_id: TitleId) -> Result<Vec<Loan>>;
}
