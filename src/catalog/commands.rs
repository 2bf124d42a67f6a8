/// 상품 관련 커맨드/쿼리 처리
/// 1. 목록 조회
/// 2. 단건 조회
/// 3. 등록
/// 4. 수정
/// 5. 삭제
// region:    --- Imports
use crate::auth::Claims;
use crate::catalog::model::{Product, ProductPayload, ProductView};
use crate::error::AppError;
use crate::policy::can_modify;
use crate::store::MarketStore;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Queries
/// 1. 목록 조회 (판매자, 입찰 포함)
pub async fn list_products(store: &dyn MarketStore) -> Result<Vec<ProductView>, AppError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    store.list_products().await
}

/// 2. 단건 조회
pub async fn get_product(store: &dyn MarketStore, id: i64) -> Result<ProductView, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", id);
    store
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound("Product"))
}

// endregion: --- Queries

// region:    --- Commands
/// 3. 등록. 판매자는 항상 호출자
pub async fn create_product(
    store: &dyn MarketStore,
    payload: ProductPayload,
    caller: &Claims,
) -> Result<Product, AppError> {
    info!("{:<12} --> 상품 등록 요청 seller: {}", "Command", caller.id);
    let new_product = payload.into_new_product(caller.id)?;
    let product = store.create_product(new_product).await?;
    info!("{:<12} --> 상품 등록 완료 id: {}", "Command", product.id);
    Ok(product)
}

/// 4. 수정. 판매자 또는 관리자만
/// 바디 오류보다 NotFound, Forbidden 을 먼저 응답한다.
pub async fn update_product(
    store: &dyn MarketStore,
    id: i64,
    payload: Result<ProductPayload, AppError>,
    caller: &Claims,
) -> Result<Product, AppError> {
    info!(
        "{:<12} --> 상품 수정 요청 id: {}, caller: {}",
        "Command", id, caller.id
    );
    let changes = match payload.and_then(ProductPayload::into_changes) {
        Ok(changes) => changes,
        Err(e) => {
            let product = store
                .get_product(id)
                .await?
                .ok_or(AppError::NotFound("Product"))?;
            if !can_modify(product.product.seller_id, caller) {
                log_rejection(&AppError::Forbidden, "수정", id, caller);
                return Err(AppError::Forbidden);
            }
            return Err(e);
        }
    };
    store
        .update_product(id, changes, caller)
        .await
        .inspect_err(|e| log_rejection(e, "수정", id, caller))
}

/// 5. 삭제. 판매자 또는 관리자만
pub async fn delete_product(
    store: &dyn MarketStore,
    id: i64,
    caller: &Claims,
) -> Result<(), AppError> {
    info!(
        "{:<12} --> 상품 삭제 요청 id: {}, caller: {}",
        "Command", id, caller.id
    );
    store
        .delete_product(id, caller)
        .await
        .inspect_err(|e| log_rejection(e, "삭제", id, caller))
}

// endregion: --- Commands

fn log_rejection(err: &AppError, action: &str, id: i64, caller: &Claims) {
    if matches!(err, AppError::Forbidden) {
        warn!(
            "{:<12} --> 상품 {} 권한 없음 id: {}, caller: {}",
            "Command", action, id, caller.id
        );
    }
}
