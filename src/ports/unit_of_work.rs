use crate::domain::{BorrowerId, TitleId, loan::Loan, title::Title};
use async_trait::async_trait;

use super::Result;

/// 作業単位（トランザクション）を開始するポート
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 新しいトランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn LendingTransaction>>;
}

/// 在庫数と貸出記録を原子的に更新するトランザクション
///
/// - `lock_title`はタイトル行の排他ロックを取得し、コミットまたは破棄まで保持する
/// - 同じタイトルへの2つ目の`lock_title`は先行トランザクションの終了まで待機する
/// - 書き込みは`commit`で初めて反映される。コミットせずにdropした場合はすべて破棄される
#[async_trait]
pub trait LendingTransaction: Send {
    /// タイトル行を排他ロックして読み込む
    async fn lock_title(&mut self, title_id: TitleId) -> Result<Option<Title>>;

    /// (タイトル, 借り手) の貸出中の記録を取得する
    async fn find_open_loan(
        &mut self,
        title_id: TitleId,
        borrower_id: BorrowerId,
    ) -> Result<Option<Loan>>;

    /// ロック済みタイトルの在庫数と書誌情報を保存する
    async fn save_title(&mut self, title: &Title) -> Result<()>;

    /// 新しい貸出記録を追加する
    async fn insert_loan(&mut self, loan: &Loan) -> Result<()>;

    /// 既存の貸出記録の返却日時を保存する
    async fn save_loan(&mut self, loan: &Loan) -> Result<()>;

    /// コミットしてロックを解放する
    async fn commit(self: Box<Self>) -> Result<()>;

    /// 明示的に破棄してロックを解放する
    async fn rollback(self: Box<Self>) -> Result<()>;
}
