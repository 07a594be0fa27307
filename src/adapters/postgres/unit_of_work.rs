use crate::domain::{BorrowerId, TitleId, loan::Loan, title::Title};
use crate::ports::{LendingTransaction, Result, UnitOfWork as UnitOfWorkTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::rows::{LOAN_COLUMNS, TITLE_COLUMNS, count_to_db, map_row_to_loan, map_row_to_title};

/// PostgreSQL implementation of UnitOfWork
///
/// Each unit of work is one database transaction. Title rows are locked with
/// `SELECT ... FOR UPDATE`, which blocks concurrent lockers of the same row
/// until this transaction commits or rolls back.
pub struct UnitOfWork {
    pool: PgPool,
}

impl UnitOfWork {
    /// Create a new UnitOfWork with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkTrait for UnitOfWork {
    async fn begin(&self) -> Result<Box<dyn LendingTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// An open database transaction
///
/// sqlx rolls the transaction back when it is dropped without commit.
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LendingTransaction for PostgresTransaction {
    async fn lock_title(&mut self, title_id: TitleId) -> Result<Option<Title>> {
        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(title_id.value())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(map_row_to_title).transpose()
    }

    async fn find_open_loan(
        &mut self,
        title_id: TitleId,
        borrower_id: BorrowerId,
    ) -> Result<Option<Loan>> {
        let sql = format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE title_id = $1 AND borrower_id = $2 AND returned_at IS NULL
            "#
        );
        let row = sqlx::query(&sql)
            .bind(title_id.value())
            .bind(borrower_id.value())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn save_title(&mut self, title: &Title) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE titles
            SET author = $2,
                title = $3,
                publication_year = $4,
                total_copies = $5,
                available_copies = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(title.id.value())
        .bind(&title.author)
        .bind(&title.title)
        .bind(title.publication_year)
        .bind(count_to_db(title.total_copies)?)
        .bind(count_to_db(title.available_copies)?)
        .bind(title.updated_at)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() != 1 {
            return Err(format!("title {} vanished during update", title.id.value()).into());
        }
        Ok(())
    }

    async fn insert_loan(&mut self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, title_id, borrower_id, borrowed_at, returned_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(loan.id.value())
        .bind(loan.title_id.value())
        .bind(loan.borrower_id.value())
        .bind(loan.borrowed_at)
        .bind(loan.returned_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn save_loan(&mut self, loan: &Loan) -> Result<()> {
        let result = sqlx::query("UPDATE loans SET returned_at = $2 WHERE id = $1")
            .bind(loan.id.value())
            .bind(loan.returned_at)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() != 1 {
            return Err(format!("loan {} vanished during update", loan.id.value()).into());
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
