/// PostgreSQL 저장소
/// 권한 검사 후 변경하는 작업은 행 잠금을 잡은 트랜잭션 안에서 수행한다.
// region:    --- Imports
use super::queries;
use super::DatabaseManager;
use crate::auth::model::{NewUser, User, UserSummary};
use crate::auth::Claims;
use crate::bidding::model::{Bid, NewBid};
use crate::catalog::model::{NewProduct, Product, ProductChanges, ProductView};
use crate::error::{has_code, AppError};
use crate::policy::can_modify;
use crate::store::{MarketStore, EMAIL_TAKEN, USERNAME_TAKEN};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

/// PostgreSQL foreign_key_violation
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PostgresMarketStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresMarketStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }

    /// 상품 목록에 판매자와 입찰 목록을 붙인다
    async fn attach_associations(
        &self,
        products: Vec<Product>,
    ) -> Result<Vec<ProductView>, AppError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let seller_ids: Vec<i64> = products.iter().map(|p| p.seller_id).collect();

        let sellers = sqlx::query_as::<_, UserSummary>(queries::GET_USER_SUMMARIES)
            .bind(&seller_ids)
            .fetch_all(self.db_manager.pool())
            .await?;
        let bids = sqlx::query_as::<_, Bid>(queries::GET_BIDS_FOR_PRODUCTS)
            .bind(&product_ids)
            .fetch_all(self.db_manager.pool())
            .await?;

        Ok(assemble_views(products, sellers, bids))
    }
}

fn assemble_views(
    products: Vec<Product>,
    sellers: Vec<UserSummary>,
    bids: Vec<Bid>,
) -> Vec<ProductView> {
    let sellers: HashMap<i64, UserSummary> = sellers.into_iter().map(|u| (u.id, u)).collect();
    let mut bids_by_product: HashMap<i64, Vec<Bid>> = HashMap::new();
    for bid in bids {
        bids_by_product.entry(bid.product_id).or_default().push(bid);
    }

    products
        .into_iter()
        .map(|product| ProductView {
            seller: sellers.get(&product.seller_id).cloned(),
            bids: bids_by_product.remove(&product.id).unwrap_or_default(),
            product,
        })
        .collect()
}

fn user_conflict(err: sqlx::Error) -> AppError {
    let message = match &err {
        sqlx::Error::Database(db) if db.constraint() == Some("users_username_key") => {
            USERNAME_TAKEN
        }
        _ => EMAIL_TAKEN,
    };
    AppError::from_unique_violation(err, message)
}

/// 토큰의 사용자가 존재하지 않으면 외래 키 위반이 난다
fn unknown_user(err: sqlx::Error) -> AppError {
    if has_code(&err, PG_FOREIGN_KEY_VIOLATION) {
        AppError::Unauthorized
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl MarketStore for PostgresMarketStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let email_taken: bool = sqlx::query_scalar(queries::EXISTS_USER_EMAIL)
                        .bind(&user.email)
                        .fetch_one(&mut **tx)
                        .await?;
                    if email_taken {
                        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
                    }

                    let username_taken: bool = sqlx::query_scalar(queries::EXISTS_USER_USERNAME)
                        .bind(&user.username)
                        .fetch_one(&mut **tx)
                        .await?;
                    if username_taken {
                        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
                    }

                    // 동시 가입은 unique 제약으로 걸러진다
                    let created = sqlx::query_as::<_, User>(queries::INSERT_USER)
                        .bind(&user.username)
                        .bind(&user.email)
                        .bind(&user.password_hash)
                        .bind(user.admin)
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(user_conflict)?;
                    Ok::<User, AppError>(created)
                })
            })
            .await
    }

    async fn email_taken(&self, email: &str) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(queries::EXISTS_USER_EMAIL)
            .bind(email)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(taken)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(user)
    }

    async fn list_products(&self) -> Result<Vec<ProductView>, AppError> {
        let products = sqlx::query_as::<_, Product>(queries::GET_ALL_PRODUCTS)
            .fetch_all(self.db_manager.pool())
            .await?;
        debug!("{:<12} --> 상품 {}건 조회", "Store", products.len());
        self.attach_associations(products).await
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductView>, AppError> {
        let product = sqlx::query_as::<_, Product>(queries::GET_PRODUCT)
            .bind(id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        match product {
            Some(product) => Ok(self.attach_associations(vec![product]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(queries::INSERT_PRODUCT)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(product.original_price)
            .bind(&product.picture_url)
            .bind(product.end_date)
            .bind(product.seller_id)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(unknown_user)
    }

    async fn update_product(
        &self,
        id: i64,
        changes: ProductChanges,
        caller: &Claims,
    ) -> Result<Product, AppError> {
        let caller = caller.clone();
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let seller_id: Option<i64> = sqlx::query_scalar(queries::LOCK_PRODUCT_SELLER)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    let seller_id = seller_id.ok_or(AppError::NotFound("Product"))?;
                    if !can_modify(seller_id, &caller) {
                        return Err(AppError::Forbidden);
                    }

                    let updated = sqlx::query_as::<_, Product>(queries::UPDATE_PRODUCT)
                        .bind(id)
                        .bind(changes.name)
                        .bind(changes.description)
                        .bind(changes.category)
                        .bind(changes.original_price)
                        .bind(changes.picture_url)
                        .bind(changes.end_date)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<Product, AppError>(updated)
                })
            })
            .await
    }

    async fn delete_product(&self, id: i64, caller: &Claims) -> Result<(), AppError> {
        let caller = caller.clone();
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let seller_id: Option<i64> = sqlx::query_scalar(queries::LOCK_PRODUCT_SELLER)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    let seller_id = seller_id.ok_or(AppError::NotFound("Product"))?;
                    if !can_modify(seller_id, &caller) {
                        return Err(AppError::Forbidden);
                    }

                    sqlx::query(queries::DELETE_PRODUCT)
                        .bind(id)
                        .execute(&mut **tx)
                        .await?;
                    info!("{:<12} --> 상품 삭제 id: {}", "Store", id);
                    Ok::<(), AppError>(())
                })
            })
            .await
    }

    async fn create_bid(&self, bid: NewBid) -> Result<Bid, AppError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    // 커밋 전까지 상품 삭제를 막는다
                    let product: Option<i64> = sqlx::query_scalar(queries::SHARE_LOCK_PRODUCT)
                        .bind(bid.product_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if product.is_none() {
                        return Err(AppError::NotFound("Product"));
                    }

                    let created = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(bid.product_id)
                        .bind(bid.bidder_id)
                        .bind(bid.price)
                        .bind(bid.date)
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(unknown_user)?;
                    Ok::<Bid, AppError>(created)
                })
            })
            .await
    }

    async fn delete_bid(&self, id: i64, caller: &Claims) -> Result<(), AppError> {
        let caller = caller.clone();
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let bidder_id: Option<i64> = sqlx::query_scalar(queries::LOCK_BID_BIDDER)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    let bidder_id = bidder_id.ok_or(AppError::NotFound("Bid"))?;
                    if !can_modify(bidder_id, &caller) {
                        return Err(AppError::Forbidden);
                    }

                    sqlx::query(queries::DELETE_BID)
                        .bind(id)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<(), AppError>(())
                })
            })
            .await
    }
}
