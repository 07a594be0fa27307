use crate::domain::{
    self, Isbn, TitleId,
    commands::{CreateTitle, UpdateQuantity, UpdateTitle},
    title::{NewTitle, Title, TitleDetails},
};
use crate::ports::LendingTransaction;

use super::dependencies::ServiceDependencies;
use super::errors::{ApplicationError, Result};
use super::transaction::finish;

/// タイトルを登録する
///
/// ビジネスルール：
/// - ISBN・著者名・書名・所蔵数（1以上）が妥当であること
/// - 表紙画像がある場合は拡張子とサイズが許可範囲内であること
/// - ISBNが重複しないこと
/// - 登録時は全冊が貸出可能
///
/// 表紙画像は検証と重複確認を終えてから保存する。
/// ISBNの重複は保存時にも原子的に判定され、同時登録の後続はConflictになる。
/// その場合、保存済みの表紙画像は削除する。
pub async fn create_title(deps: &ServiceDependencies, cmd: CreateTitle) -> Result<Title> {
    // 1. 入力値の検証
    let isbn = Isbn::parse(&cmd.isbn)?;
    let new_title = NewTitle {
        isbn: isbn.clone(),
        author: cmd.author,
        title: cmd.title,
        publication_year: cmd.publication_year,
        total_copies: cmd.total_copies,
    };
    let title = domain::title::register_title(new_title, None, cmd.created_at)?;

    let cover = match cmd.cover {
        Some(upload) => {
            let extension = domain::title::validate_cover(upload.bytes.len(), &upload.extension)?;
            Some((upload.bytes, extension))
        }
        None => None,
    };

    // 2. ISBNの重複確認
    let existing = deps
        .title_store
        .find_by_isbn(&isbn)
        .await
        .map_err(ApplicationError::StoreError)?;
    if existing.is_some() {
        return Err(ApplicationError::DuplicateIsbn(isbn.to_string()));
    }

    // 3. 表紙画像の保存
    let cover_image = match cover {
        Some((bytes, extension)) => Some(
            deps.cover_store
                .save(bytes, &extension)
                .await
                .map_err(ApplicationError::CoverStoreError)?,
        ),
        None => None,
    };
    let title = Title {
        cover_image,
        ..title
    };

    // 4. 保存（重複時はfalse）
    let inserted = deps
        .title_store
        .insert(&title)
        .await
        .map_err(ApplicationError::StoreError);
    match inserted {
        Ok(true) => {}
        Ok(false) => {
            discard_cover(deps, &title).await;
            return Err(ApplicationError::DuplicateIsbn(isbn.to_string()));
        }
        Err(err) => {
            discard_cover(deps, &title).await;
            return Err(err);
        }
    }

    tracing::info!(
        title_id = %title.id.value(),
        isbn = %title.isbn,
        total_copies = title.total_copies,
        "Title created"
    );
    Ok(title)
}

/// 登録できなかったタイトルの表紙画像を削除する
///
/// 削除の失敗は記録するのみで、登録のエラーを優先して返す。
async fn discard_cover(deps: &ServiceDependencies, title: &Title) {
    let Some(cover) = &title.cover_image else {
        return;
    };
    if let Err(err) = deps.cover_store.remove(cover).await {
        tracing::warn!(
            cover = %cover.as_str(),
            "Failed to remove cover of unregistered title: {}",
            err
        );
    }
}

/// 所蔵数を変更する
///
/// 現在の値から貸出中の冊数を求め、貸出可能数を再計算する。
/// 貸出・返却と同じ排他ロックを取得し、読み取りから書き込みまでを1トランザクションで行う。
pub async fn update_quantity(deps: &ServiceDependencies, cmd: UpdateQuantity) -> Result<Title> {
    let mut tx = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    let result = update_quantity_locked(tx.as_mut(), &cmd).await;
    let title = finish(tx, result).await?;

    tracing::info!(
        title_id = %title.id.value(),
        total_copies = title.total_copies,
        available_copies = title.available_copies,
        "Title quantity updated"
    );
    Ok(title)
}

async fn update_quantity_locked(
    tx: &mut dyn LendingTransaction,
    cmd: &UpdateQuantity,
) -> Result<Title> {
    let title = lock_existing(tx, cmd.title_id).await?;
    let updated = domain::title::reconcile_quantity(&title, cmd.new_total, cmd.updated_at)?;

    tx.save_title(&updated)
        .await
        .map_err(ApplicationError::StoreError)?;
    Ok(updated)
}

/// 書誌情報を部分更新する
///
/// 指定されたフィールドのみを反映する。所蔵数が指定された場合は
/// `update_quantity()`と同じ再計算を同じトランザクション内で行う。
pub async fn update_title(deps: &ServiceDependencies, cmd: UpdateTitle) -> Result<Title> {
    let mut tx = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    let result = update_title_locked(tx.as_mut(), &cmd).await;
    let title = finish(tx, result).await?;

    tracing::info!(title_id = %title.id.value(), "Title updated");
    Ok(title)
}

async fn update_title_locked(tx: &mut dyn LendingTransaction, cmd: &UpdateTitle) -> Result<Title> {
    let title = lock_existing(tx, cmd.title_id).await?;

    let details = TitleDetails {
        author: cmd.author.clone(),
        title: cmd.title.clone(),
        publication_year: cmd.publication_year,
    };
    let mut updated = domain::title::apply_details(&title, &details, cmd.updated_at)?;
    if let Some(new_total) = cmd.total_copies {
        updated = domain::title::reconcile_quantity(&updated, new_total, cmd.updated_at)?;
    }

    tx.save_title(&updated)
        .await
        .map_err(ApplicationError::StoreError)?;
    Ok(updated)
}

async fn lock_existing(tx: &mut dyn LendingTransaction, title_id: TitleId) -> Result<Title> {
    tx.lock_title(title_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::TitleNotFound)
}

/// IDでタイトルを取得する
pub async fn get_title(deps: &ServiceDependencies, title_id: TitleId) -> Result<Title> {
    deps.title_store
        .get_by_id(title_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::TitleNotFound)
}
