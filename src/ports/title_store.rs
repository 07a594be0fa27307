use crate::domain::{
    Isbn, TitleId,
    catalog::{Pagination, TitleFilter},
    title::Title,
};
use async_trait::async_trait;

use super::Result;

/// 在庫レコードストアポート
///
/// ロックを伴わない読み取りと、新規登録を扱う。
/// 在庫数の更新は`LendingTransaction`を経由する。
#[async_trait]
pub trait TitleStore: Send + Sync {
    /// タイトルを登録する
    ///
    /// 同じISBNが既に存在する場合は何もせず`false`を返す。
    /// 重複判定は保存と同じ操作内で原子的に行うこと。
    async fn insert(&self, title: &Title) -> Result<bool>;

    /// IDでタイトルを取得する
    async fn get_by_id(&self, title_id: TitleId) -> Result<Option<Title>>;

    /// ISBNでタイトルを取得する
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Title>>;

    /// 条件に合うタイトルの1ページ分と総件数を返す
    ///
    /// 書名、ID の順で並べる。
    async fn search(
        &self,
        filter: &TitleFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Title>, u64)>;
}
