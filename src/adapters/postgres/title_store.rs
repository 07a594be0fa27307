use crate::domain::{
    Isbn, TitleId,
    catalog::{Pagination, TitleFilter},
    title::Title,
};
use crate::ports::{Result, TitleStore as TitleStoreTrait};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{TITLE_COLUMNS, contains_pattern, count_to_db, map_row_to_title};

/// PostgreSQL implementation of TitleStore
///
/// Reads here take no lock. Counter updates go through `PostgresUnitOfWork`.
pub struct TitleStore {
    pool: PgPool,
}

impl TitleStore {
    /// Create a new TitleStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TitleStoreTrait for TitleStore {
    /// Insert a title, relying on the unique ISBN constraint
    ///
    /// `ON CONFLICT DO NOTHING` makes the duplicate check atomic with the insert.
    async fn insert(&self, title: &Title) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO titles (
                id,
                isbn,
                author,
                title,
                publication_year,
                total_copies,
                available_copies,
                cover_image,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (isbn) DO NOTHING
            "#,
        )
        .bind(title.id.value())
        .bind(title.isbn.as_str())
        .bind(&title.author)
        .bind(&title.title)
        .bind(title.publication_year)
        .bind(count_to_db(title.total_copies)?)
        .bind(count_to_db(title.available_copies)?)
        .bind(title.cover_image.as_ref().map(|c| c.as_str()))
        .bind(title.created_at)
        .bind(title.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_by_id(&self, title_id: TitleId) -> Result<Option<Title>> {
        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(title_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_title).transpose()
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Title>> {
        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE isbn = $1");
        let row = sqlx::query(&sql)
            .bind(isbn.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_title).transpose()
    }

    /// Case-insensitive substring search with offset pagination
    ///
    /// The page and the total count are read by two separate statements,
    /// so they may disagree slightly under concurrent writes.
    async fn search(
        &self,
        filter: &TitleFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Title>, u64)> {
        let title_pattern = filter.title.as_deref().map(contains_pattern);
        let author_pattern = filter.author.as_deref().map(contains_pattern);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM titles
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR author ILIKE $2)
            "#,
        )
        .bind(title_pattern.as_deref())
        .bind(author_pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {TITLE_COLUMNS}
            FROM titles
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR author ILIKE $2)
            ORDER BY title ASC, id ASC
            LIMIT $3 OFFSET $4
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(title_pattern.as_deref())
            .bind(author_pattern.as_deref())
            .bind(i64::from(pagination.limit()))
            .bind(i64::try_from(pagination.offset())?)
            .fetch_all(&self.pool)
            .await?;

        let items = rows.iter().map(map_row_to_title).collect::<Result<Vec<_>>>()?;
        Ok((items, u64::try_from(total)?))
    }
}
