use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub product_id: i64,
    pub bidder_id: i64,
    pub price: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBid {
    pub product_id: i64,
    pub bidder_id: i64,
    pub price: f64,
    pub date: DateTime<Utc>,
}

/// 입찰 요청 바디. productId, bidderId, date 는 서버에서 정한다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidPayload {
    pub price: Option<f64>,
}

impl BidPayload {
    pub fn into_new_bid(self, product_id: i64, bidder_id: i64) -> Result<NewBid, AppError> {
        match self.price {
            Some(price) if price.is_finite() && price > 0.0 => Ok(NewBid {
                product_id,
                bidder_id,
                price,
                date: Utc::now(),
            }),
            Some(_) => Err(AppError::validation("price must be a positive number")),
            None => Err(AppError::validation("price is required")),
        }
    }
}
