/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 입찰 취소
// region:    --- Imports
use crate::auth::Claims;
use crate::bidding::model::{Bid, BidPayload};
use crate::error::AppError;
use crate::store::MarketStore;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 1. 입찰
/// 입찰자는 항상 호출자이며, 입찰 시각은 서버에서 정한다.
/// 상품이 없으면 바디 오류보다 NotFound 를 먼저 응답한다.
pub async fn place_bid(
    store: &dyn MarketStore,
    product_id: i64,
    payload: Result<BidPayload, AppError>,
    caller: &Claims,
) -> Result<Bid, AppError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작 product: {}, bidder: {}",
        "Command", product_id, caller.id
    );
    let new_bid = match payload.and_then(|p| p.into_new_bid(product_id, caller.id)) {
        Ok(new_bid) => new_bid,
        Err(e) => {
            if store.get_product(product_id).await?.is_none() {
                return Err(AppError::NotFound("Product"));
            }
            return Err(e);
        }
    };
    let bid = store.create_bid(new_bid).await?;
    info!(
        "{:<12} --> 입찰 완료 id: {}, price: {}",
        "Command", bid.id, bid.price
    );
    Ok(bid)
}

/// 2. 입찰 취소. 입찰자 또는 관리자만
pub async fn delete_bid(store: &dyn MarketStore, id: i64, caller: &Claims) -> Result<(), AppError> {
    info!(
        "{:<12} --> 입찰 삭제 요청 id: {}, caller: {}",
        "Command", id, caller.id
    );
    match store.delete_bid(id, caller).await {
        Err(AppError::Forbidden) => {
            warn!(
                "{:<12} --> 입찰 삭제 권한 없음 id: {}, caller: {}",
                "Command", id, caller.id
            );
            Err(AppError::Forbidden)
        }
        result => result,
    }
}

// endregion: --- Commands
