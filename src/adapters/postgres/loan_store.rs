use crate::domain::{BorrowerId, TitleId, loan::Loan};
use crate::ports::{LoanStore as LoanStoreTrait, Result};
use async_trait::async_trait;
use futures::stream::{StreamExt, TryStreamExt};
use sqlx::PgPool;

use super::rows::{LOAN_COLUMNS, map_row_to_loan};

/// PostgreSQL implementation of LoanStore (read side)
pub struct LoanStore {
    pool: PgPool,
}

impl LoanStore {
    /// Create a new LoanStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    /// Stream the whole ledger, newest first
    async fn list_history(&self) -> Result<Vec<Loan>> {
        let sql = format!("SELECT {LOAN_COLUMNS} FROM loans ORDER BY borrowed_at DESC, id ASC");
        sqlx::query(&sql)
            .fetch(&self.pool)
            .map(|row_result| -> Result<Loan> {
                let row = row_result?;
                map_row_to_loan(&row)
            })
            .try_collect()
            .await
    }

    async fn find_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Loan>> {
        let sql = format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE borrower_id = $1 ORDER BY borrowed_at DESC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(borrower_id.value())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn find_open_by_title(&self, title_id: TitleId) -> Result<Vec<Loan>> {
        let sql = format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE title_id = $1 AND returned_at IS NULL
            ORDER BY borrowed_at DESC, id ASC
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(title_id.value())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_loan).collect()
    }
}
