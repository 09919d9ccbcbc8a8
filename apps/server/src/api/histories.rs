use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{
    error::ApiResult,
    extract::{AppJson, AppPath},
    main_lib::AppState,
    models::{History, HistoryList, HistoryPayload, MoveHistoryPayload},
};

#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}/histories",
    params(("wallet_id" = i32, Path, description = "Wallet id")),
    responses((status = 200, body = HistoryList), (status = 404, description = "Unknown wallet"))
)]
pub async fn list_histories(
    AppPath(wallet_id): AppPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HistoryList>> {
    let histories = state.history_service.list_histories(wallet_id).await?;
    Ok(Json(HistoryList {
        histories: histories.into_iter().map(History::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}/histories/{history_id}",
    params(
        ("wallet_id" = i32, Path, description = "Wallet id"),
        ("history_id" = i32, Path, description = "History id")
    ),
    responses((status = 200, body = History), (status = 404, description = "Unknown wallet or history"))
)]
pub async fn get_history(
    AppPath((wallet_id, history_id)): AppPath<(i32, i32)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<History>> {
    let history = state
        .history_service
        .get_history(wallet_id, history_id)
        .await?;
    Ok(Json(History::from(history)))
}

#[utoipa::path(
    post,
    path = "/api/v1/wallets/{wallet_id}/histories",
    params(("wallet_id" = i32, Path, description = "Wallet id")),
    request_body = HistoryPayload,
    responses((status = 201, body = History), (status = 422, description = "Invalid payload"))
)]
pub async fn create_history(
    AppPath(wallet_id): AppPath<i32>,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<HistoryPayload>,
) -> ApiResult<(StatusCode, Json<History>)> {
    let new_history = payload.validate()?;
    let history = state
        .history_service
        .create_history(wallet_id, new_history)
        .await?;
    Ok((StatusCode::CREATED, Json(History::from(history))))
}

#[utoipa::path(
    put,
    path = "/api/v1/wallets/{wallet_id}/histories/{history_id}",
    params(
        ("wallet_id" = i32, Path, description = "Wallet id"),
        ("history_id" = i32, Path, description = "History id")
    ),
    request_body = HistoryPayload,
    responses((status = 200, body = History), (status = 404, description = "Unknown wallet or history"))
)]
pub async fn update_history(
    AppPath((wallet_id, history_id)): AppPath<(i32, i32)>,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<HistoryPayload>,
) -> ApiResult<Json<History>> {
    let changes = payload.validate()?;
    let history = state
        .history_service
        .update_history(
            wallet_id,
            history_id,
            changes.name,
            changes.amount,
            changes.history_type,
            changes.history_at,
        )
        .await?;
    Ok(Json(History::from(history)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/wallets/{wallet_id}/histories/{history_id}",
    params(
        ("wallet_id" = i32, Path, description = "Wallet id"),
        ("history_id" = i32, Path, description = "History id")
    ),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_history(
    AppPath((wallet_id, history_id)): AppPath<(i32, i32)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .history_service
        .delete_history(wallet_id, history_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/wallets/{wallet_id}/histories/{history_id}/move",
    params(
        ("wallet_id" = i32, Path, description = "Current owner"),
        ("history_id" = i32, Path, description = "History id")
    ),
    request_body = MoveHistoryPayload,
    responses((status = 200, body = History), (status = 404, description = "Unknown wallet or history"))
)]
pub async fn move_history(
    AppPath((wallet_id, history_id)): AppPath<(i32, i32)>,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<MoveHistoryPayload>,
) -> ApiResult<Json<History>> {
    let history = state
        .history_service
        .move_history(wallet_id, history_id, payload.destination_id)
        .await?;
    Ok(Json(History::from(history)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/wallets/{wallet_id}/histories",
            get(list_histories).post(create_history),
        )
        .route(
            "/wallets/{wallet_id}/histories/{history_id}",
            get(get_history).put(update_history).delete(delete_history),
        )
        .route(
            "/wallets/{wallet_id}/histories/{history_id}/move",
            post(move_history),
        )
}
