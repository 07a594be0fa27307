use crate::domain::CoverRef;
use async_trait::async_trait;

use super::Result;

/// 表紙画像ストアポート
///
/// 保存先（ローカルディスク、オブジェクトストレージ等）を抽象化する。
/// 拡張子とサイズの検証は呼び出し側で済ませてから渡す。
#[async_trait]
pub trait CoverStore: Send + Sync {
    /// 画像を保存し、参照を返す
    async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<CoverRef>;

    /// 保存済みの画像を削除する
    ///
    /// タイトルの登録に失敗した場合の取り消しに使う。存在しない参照は無視する。
    async fn remove(&self, cover: &CoverRef) -> Result<()>;
}
