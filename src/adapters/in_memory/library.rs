use crate::domain::{
    BorrowerId, Isbn, LoanId, TitleId,
    catalog::{Pagination, TitleFilter},
    loan::Loan,
    title::Title,
};
use crate::ports::{LendingTransaction, LoanStore, Result, TitleStore, UnitOfWork};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as RowLock, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Tables {
    titles: HashMap<TitleId, Title>,
    loans: HashMap<LoanId, Loan>,
}

type RowLocks = Mutex<HashMap<TitleId, Arc<RowLock<()>>>>;

fn lock_tables(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>> {
    tables
        .lock()
        .map_err(|e| format!("in-memory tables poisoned: {e}").into())
}

fn newest_first(mut loans: Vec<Loan>) -> Vec<Loan> {
    loans.sort_by(|a, b| b.borrowed_at.cmp(&a.borrowed_at));
    loans
}

/// In-memory implementation of TitleStore, LoanStore and UnitOfWork
///
/// Row locking is simulated with one `tokio::sync::Mutex` per title.
/// A transaction holds the owned guard until it commits or is dropped,
/// so operations on the same title serialize and different titles never block.
/// Writes are staged inside the transaction and only applied on commit.
#[derive(Default)]
pub struct InMemoryLibrary {
    tables: Arc<Mutex<Tables>>,
    row_locks: Arc<RowLocks>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a title row as-is, bypassing every rule.
    ///
    /// Lets tests seed contrived states such as a corrupted inventory.
    pub fn seed_title(&self, title: Title) -> Result<()> {
        lock_tables(&self.tables)?.titles.insert(title.id, title);
        Ok(())
    }

    /// Insert or overwrite a loan row as-is, bypassing every rule.
    pub fn seed_loan(&self, loan: Loan) -> Result<()> {
        lock_tables(&self.tables)?.loans.insert(loan.id, loan);
        Ok(())
    }
}

#[async_trait]
impl TitleStore for InMemoryLibrary {
    async fn insert(&self, title: &Title) -> Result<bool> {
        let mut tables = lock_tables(&self.tables)?;
        if tables.titles.values().any(|t| t.isbn == title.isbn) {
            return Ok(false);
        }
        tables.titles.insert(title.id, title.clone());
        Ok(true)
    }

    async fn get_by_id(&self, title_id: TitleId) -> Result<Option<Title>> {
        Ok(lock_tables(&self.tables)?.titles.get(&title_id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Title>> {
        Ok(lock_tables(&self.tables)?
            .titles
            .values()
            .find(|t| &t.isbn == isbn)
            .cloned())
    }

    async fn search(
        &self,
        filter: &TitleFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Title>, u64)> {
        let mut matched: Vec<Title> = lock_tables(&self.tables)?
            .titles
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let total = matched.len() as u64;
        let offset = usize::try_from(pagination.offset())?;
        let items = matched
            .into_iter()
            .skip(offset)
            .take(pagination.limit() as usize)
            .collect();
        Ok((items, total))
    }
}

#[async_trait]
impl LoanStore for InMemoryLibrary {
    async fn list_history(&self) -> Result<Vec<Loan>> {
        let loans = lock_tables(&self.tables)?.loans.values().cloned().collect();
        Ok(newest_first(loans))
    }

    async fn find_by_borrower(&self, borrower_id: BorrowerId) -> Result<Vec<Loan>> {
        let loans = lock_tables(&self.tables)?
            .loans
            .values()
            .filter(|l| l.borrower_id == borrower_id)
            .cloned()
            .collect();
        Ok(newest_first(loans))
    }

    async fn find_open_by_title(&self, title_id: TitleId) -> Result<Vec<Loan>> {
        let loans = lock_tables(&self.tables)?
            .loans
            .values()
            .filter(|l| l.title_id == title_id && l.is_open())
            .cloned()
            .collect();
        Ok(newest_first(loans))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryLibrary {
    async fn begin(&self) -> Result<Box<dyn LendingTransaction>> {
        Ok(Box::new(InMemoryTransaction {
            tables: Arc::clone(&self.tables),
            row_locks: Arc::clone(&self.row_locks),
            held: HashMap::new(),
            staged_titles: HashMap::new(),
            staged_loans: HashMap::new(),
        }))
    }
}

/// A unit of work over `InMemoryLibrary`
///
/// Dropping it without `commit` discards all staged writes and releases the row locks.
pub struct InMemoryTransaction {
    tables: Arc<Mutex<Tables>>,
    row_locks: Arc<RowLocks>,
    held: HashMap<TitleId, OwnedMutexGuard<()>>,
    staged_titles: HashMap<TitleId, Title>,
    staged_loans: HashMap<LoanId, Loan>,
}

impl InMemoryTransaction {
    fn row_lock(&self, title_id: TitleId) -> Result<Arc<RowLock<()>>> {
        let mut locks = self
            .row_locks
            .lock()
            .map_err(|e| format!("row lock table poisoned: {e}"))?;
        Ok(Arc::clone(locks.entry(title_id).or_default()))
    }

    fn ensure_locked(&self, title_id: TitleId) -> Result<()> {
        if !self.held.contains_key(&title_id) {
            return Err(format!(
                "title {} is not locked by this transaction",
                title_id.value()
            )
            .into());
        }
        Ok(())
    }

    fn current_title(&self, title_id: TitleId) -> Result<Option<Title>> {
        if let Some(staged) = self.staged_titles.get(&title_id) {
            return Ok(Some(staged.clone()));
        }
        Ok(lock_tables(&self.tables)?.titles.get(&title_id).cloned())
    }
}

#[async_trait]
impl LendingTransaction for InMemoryTransaction {
    async fn lock_title(&mut self, title_id: TitleId) -> Result<Option<Title>> {
        if self.held.contains_key(&title_id) {
            return self.current_title(title_id);
        }
        let exists = lock_tables(&self.tables)?.titles.contains_key(&title_id);
        if !exists {
            return Ok(None);
        }

        let row_lock = self.row_lock(title_id)?;
        let guard = row_lock.lock_owned().await;
        self.held.insert(title_id, guard);

        // ロック取得中に先行トランザクションがコミットした値を読む
        self.current_title(title_id)
    }

    async fn find_open_loan(
        &mut self,
        title_id: TitleId,
        borrower_id: BorrowerId,
    ) -> Result<Option<Loan>> {
        let matches = |loan: &Loan| {
            loan.title_id == title_id && loan.borrower_id == borrower_id && loan.is_open()
        };

        if let Some(staged) = self.staged_loans.values().find(|l| matches(*l)) {
            return Ok(Some(staged.clone()));
        }
        Ok(lock_tables(&self.tables)?
            .loans
            .values()
            .find(|l| matches(*l) && !self.staged_loans.contains_key(&l.id))
            .cloned())
    }

    async fn save_title(&mut self, title: &Title) -> Result<()> {
        self.ensure_locked(title.id)?;
        self.staged_titles.insert(title.id, title.clone());
        Ok(())
    }

    async fn insert_loan(&mut self, loan: &Loan) -> Result<()> {
        self.ensure_locked(loan.title_id)?;
        if loan.is_open()
            && self
                .find_open_loan(loan.title_id, loan.borrower_id)
                .await?
                .is_some()
        {
            return Err("duplicate open loan for title and borrower".into());
        }
        self.staged_loans.insert(loan.id, loan.clone());
        Ok(())
    }

    async fn save_loan(&mut self, loan: &Loan) -> Result<()> {
        self.ensure_locked(loan.title_id)?;
        self.staged_loans.insert(loan.id, loan.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryTransaction {
            tables,
            held,
            staged_titles,
            staged_loans,
            ..
        } = *self;

        {
            let mut tables = lock_tables(&tables)?;
            tables.titles.extend(staged_titles);
            tables.loans.extend(staged_loans);
        }

        // 反映後にロックを解放する
        drop(held);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
