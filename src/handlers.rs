// region:    --- Imports
use crate::auth::credentials;
use crate::auth::model::{LoginRequest, RegisterRequest, TokenResponse};
use crate::auth::AuthUser;
use crate::bidding::commands as bidding;
use crate::bidding::model::BidPayload;
use crate::catalog::commands as catalog;
use crate::catalog::model::ProductPayload;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

// region:    --- Auth Handlers

/// 회원 가입
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    info!("{:<12} --> 회원 가입", "Handler");
    let access_token = credentials::register(state.store.as_ref(), &state.tokens, req).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { access_token })))
}

/// 로그인
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // 바디를 읽지 못해도 자격 증명 오류로 응답
    let Ok(Json(req)) = payload else {
        return Err(AppError::Unauthorized);
    };
    info!("{:<12} --> 로그인", "Handler");
    let access_token = credentials::login(state.store.as_ref(), &state.tokens, req).await?;
    Ok((StatusCode::OK, Json(TokenResponse { access_token })))
}

// endregion: --- Auth Handlers

// region:    --- Product Handlers

/// 모든 상품 조회
pub async fn handle_get_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = catalog::list_products(state.store.as_ref()).await?;
    Ok(Json(products))
}

/// 상품 조회
pub async fn handle_get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let product = catalog::get_product(state.store.as_ref(), id).await?;
    Ok(Json(product))
}

/// 상품 등록
pub async fn handle_create_product(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let product = catalog::create_product(state.store.as_ref(), payload, &caller).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// 상품 수정
pub async fn handle_update_product(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let payload = payload.map(|Json(p)| p).map_err(AppError::from);
    let product = catalog::update_product(state.store.as_ref(), id, payload, &caller).await?;
    Ok(Json(product))
}

/// 상품 삭제
pub async fn handle_delete_product(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    catalog::delete_product(state.store.as_ref(), id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Product Handlers

// region:    --- Bid Handlers

/// 입찰
pub async fn handle_place_bid(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    product_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BidPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(product_id) = product_id?;
    let payload = payload.map(|Json(p)| p).map_err(AppError::from);
    let bid = bidding::place_bid(state.store.as_ref(), product_id, payload, &caller).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// 입찰 삭제
pub async fn handle_delete_bid(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    bidding::delete_bid(state.store.as_ref(), id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Bid Handlers

/// 헬스 체크
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
