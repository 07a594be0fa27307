mod rows;

pub mod loan_store;
pub mod title_store;
pub mod unit_of_work;

// パブリックに型を再エクスポート
pub use loan_store::LoanStore as PostgresLoanStore;
pub use title_store::TitleStore as PostgresTitleStore;
pub use unit_of_work::UnitOfWork as PostgresUnitOfWork;
