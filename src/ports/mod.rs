pub mod cover_store;
pub mod loan_store;
pub mod title_store;
pub mod unit_of_work;

pub use cover_store::CoverStore;
pub use loan_store::LoanStore;
pub use title_store::TitleStore;
pub use unit_of_work::{LendingTransaction, UnitOfWork};

/// ポート共通のResult型
///
/// アダプターのI/Oエラーはアプリケーション層でラップする。
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
