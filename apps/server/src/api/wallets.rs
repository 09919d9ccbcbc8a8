use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    error::ApiResult,
    extract::{AppJson, AppPath, AppQuery},
    main_lib::AppState,
    models::{Wallet, WalletDetail, WalletList, WalletPayload, WalletQuery, WalletWithHistories},
};

#[utoipa::path(get, path = "/api/v1/wallets", responses((status = 200, body = WalletList)))]
pub async fn list_wallets(State(state): State<Arc<AppState>>) -> ApiResult<Json<WalletList>> {
    let wallets = state.wallet_service.list_wallets().await?;
    Ok(Json(WalletList {
        wallets: wallets.iter().map(Wallet::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}",
    params(
        ("wallet_id" = i32, Path, description = "Wallet id"),
        ("include_histories" = Option<bool>, Query, description = "Embed the wallet's histories")
    ),
    responses((status = 200, body = WalletDetail), (status = 404, description = "Unknown wallet"))
)]
pub async fn get_wallet(
    AppPath(wallet_id): AppPath<i32>,
    AppQuery(query): AppQuery<WalletQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WalletDetail>> {
    let wallet = state.wallet_service.get_wallet(wallet_id).await?;
    let detail = if query.include_histories {
        WalletDetail::WithHistories(WalletWithHistories::from(wallet))
    } else {
        WalletDetail::Summary(Wallet::from(&wallet))
    };
    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = WalletPayload,
    responses((status = 201, body = Wallet), (status = 422, description = "Invalid payload"))
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<WalletPayload>,
) -> ApiResult<(StatusCode, Json<Wallet>)> {
    let name = payload.validated_name()?;
    let wallet = state.wallet_service.create_wallet(name).await?;
    Ok((StatusCode::CREATED, Json(Wallet::from(&wallet))))
}

#[utoipa::path(
    put,
    path = "/api/v1/wallets/{wallet_id}",
    params(("wallet_id" = i32, Path, description = "Wallet id")),
    request_body = WalletPayload,
    responses((status = 200, body = Wallet), (status = 404, description = "Unknown wallet"))
)]
pub async fn update_wallet(
    AppPath(wallet_id): AppPath<i32>,
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<WalletPayload>,
) -> ApiResult<Json<Wallet>> {
    let name = payload.validated_name()?;
    let wallet = state.wallet_service.update_wallet(wallet_id, name).await?;
    Ok(Json(Wallet::from(&wallet)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/wallets/{wallet_id}",
    params(("wallet_id" = i32, Path, description = "Wallet id")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_wallet(
    AppPath(wallet_id): AppPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.wallet_service.delete_wallet(wallet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets", get(list_wallets).post(create_wallet))
        .route(
            "/wallets/{wallet_id}",
            get(get_wallet).put(update_wallet).delete(delete_wallet),
        )
}
