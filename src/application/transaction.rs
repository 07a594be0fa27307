use crate::ports::LendingTransaction;

use super::errors::{ApplicationError, Result};

/// トランザクション内の処理結果に応じてコミットまたはロールバックする
///
/// 処理が失敗した場合は部分的な書き込みを一切残さない。
/// ロールバック自体の失敗は記録するのみで、元のエラーを返す。
pub(super) async fn finish<T: Send>(
    tx: Box<dyn LendingTransaction>,
    result: Result<T>,
) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(ApplicationError::StoreError)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Failed to roll back transaction: {}", rollback_err);
            }
            Err(err)
        }
    }
}
