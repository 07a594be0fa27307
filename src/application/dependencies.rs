use crate::ports::{CoverStore, LoanStore, TitleStore, UnitOfWork};
use std::sync::Arc;

/// サービスの依存関係
///
/// データ構造として定義し、各サービス関数に明示的に渡す。
/// アダプターは起動時に組み立てる（グローバルな登録は使わない）。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub title_store: Arc<dyn TitleStore>,
    pub loan_store: Arc<dyn LoanStore>,
    pub unit_of_work: Arc<dyn UnitOfWork>,
    pub cover_store: Arc<dyn CoverStore>,
}
