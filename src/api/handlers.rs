use crate::application::{self, ServiceDependencies};
use crate::domain::{
    BorrowerId, TitleId,
    catalog::{DEFAULT_LIMIT, DEFAULT_PAGE},
    commands::{BorrowTitle, ReturnTitle},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        CreateTitleRequest, LendingRequest, ListLoansQuery, ListTitlesQuery, LoanResponse,
        TitlePageResponse, TitleResponse, UpdateQuantityRequest, UpdateTitleRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Inventory handlers
// ============================================================================

/// POST /titles - タイトルを登録
///
/// 強制されるビジネスルール:
/// - ISBNが10桁または13桁であること
/// - 著者名・書名が空でないこと
/// - 所蔵数が1以上であること
/// - ISBNが重複しないこと
pub async fn create_title(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTitleRequest>,
) -> Result<(StatusCode, Json<TitleResponse>), ApiError> {
    let cmd = req.to_command(Utc::now());
    let title = application::create_title(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(TitleResponse::from(title))))
}

/// GET /titles/:id - タイトル詳細をIDで取得
pub async fn get_title(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<Uuid>,
) -> Result<Json<TitleResponse>, ApiError> {
    let title = application::get_title(&state.service_deps, TitleId::from_uuid(title_id)).await?;
    Ok(Json(TitleResponse::from(title)))
}

/// PATCH /titles/:id - 書誌情報を部分更新
///
/// `total_copies`が指定された場合は貸出可能数も再計算する。
pub async fn update_title(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<Uuid>,
    Json(req): Json<UpdateTitleRequest>,
) -> Result<Json<TitleResponse>, ApiError> {
    let cmd = req.to_command(TitleId::from_uuid(title_id), Utc::now());
    let title = application::update_title(&state.service_deps, cmd).await?;
    Ok(Json(TitleResponse::from(title)))
}

/// PUT /titles/:id/quantity - 所蔵数を変更
///
/// 強制されるビジネスルール:
/// - 新しい所蔵数が1以上であること
/// - 新しい所蔵数が貸出中の冊数を下回らないこと
pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<Uuid>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<TitleResponse>, ApiError> {
    let cmd = req.to_command(TitleId::from_uuid(title_id), Utc::now());
    let title = application::update_quantity(&state.service_deps, cmd).await?;
    Ok(Json(TitleResponse::from(title)))
}

// ============================================================================
// Lending handlers
// ============================================================================

/// POST /titles/:id/borrow - タイトルを借りる
///
/// 強制されるビジネスルール:
/// - タイトルが存在すること
/// - 貸出可能な冊数が残っていること
/// - 同じ借り手が同じタイトルを借りていないこと
pub async fn borrow_title(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<Uuid>,
    Json(req): Json<LendingRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let cmd = BorrowTitle {
        title_id: TitleId::from_uuid(title_id),
        borrower_id: BorrowerId::from_uuid(req.borrower_id),
        borrowed_at: Utc::now(),
    };
    let loan = application::borrow_title(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

/// POST /titles/:id/return - タイトルを返す
pub async fn return_title(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<Uuid>,
    Json(req): Json<LendingRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let cmd = ReturnTitle {
        title_id: TitleId::from_uuid(title_id),
        borrower_id: BorrowerId::from_uuid(req.borrower_id),
        returned_at: Utc::now(),
    };
    let loan = application::return_title(&state.service_deps, cmd).await?;

    Ok(Json(LoanResponse::from(loan)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /titles - タイトル一覧取得
///
/// クエリパラメータ:
/// - title: 書名の部分一致（オプション）
/// - author: 著者名の部分一致（オプション）
/// - page: 1始まりのページ番号（デフォルト1）
/// - limit: 1ページの件数、1〜100（デフォルト10）
pub async fn list_titles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTitlesQuery>,
) -> Result<Json<TitlePageResponse>, ApiError> {
    let page = application::list_titles(
        &state.service_deps,
        query.filter(),
        query.page.unwrap_or(DEFAULT_PAGE),
        query.limit.unwrap_or(DEFAULT_LIMIT),
    )
    .await?;

    Ok(Json(TitlePageResponse::from(page)))
}

/// GET /loans - 貸出履歴取得
///
/// `borrower_id`が指定された場合はその借り手の履歴のみ、
/// 指定されない場合は全履歴を新しい順に返す。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = match query.borrower_id {
        Some(borrower_id) => {
            application::list_loans_for_borrower(
                &state.service_deps,
                BorrowerId::from_uuid(borrower_id),
            )
            .await?
        }
        None => application::list_loan_history(&state.service_deps).await?,
    };

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}

/// GET /titles/:id/loans - タイトルの貸出中の記録を取得
pub async fn list_open_loans(
    State(state): State<Arc<AppState>>,
    Path(title_id): Path<Uuid>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans =
        application::list_open_loans_for_title(&state.service_deps, TitleId::from_uuid(title_id))
            .await?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}
