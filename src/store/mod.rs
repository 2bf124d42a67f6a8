/// 저장소 트레이트
/// 권한 검사가 필요한 변경 작업은 검사와 변경을 하나의 원자적 단위로 수행한다.
// region:    --- Imports
use crate::auth::model::{NewUser, User};
use crate::auth::Claims;
use crate::bidding::model::{Bid, NewBid};
use crate::catalog::model::{NewProduct, Product, ProductChanges, ProductView};
use crate::error::AppError;
use async_trait::async_trait;

// endregion: --- Imports

pub mod memory;

pub const EMAIL_TAKEN: &str = "E-mail already used";
pub const USERNAME_TAKEN: &str = "Username already used";

#[async_trait]
pub trait MarketStore: Send + Sync {
    /// 이메일 중복 -> 사용자명 중복 순으로 검사 후 생성
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    /// 가입 요청의 나머지 필드 검증 전에 이메일 중복만 먼저 확인한다
    async fn email_taken(&self, email: &str) -> Result<bool, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list_products(&self) -> Result<Vec<ProductView>, AppError>;

    async fn get_product(&self, id: i64) -> Result<Option<ProductView>, AppError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, AppError>;

    /// 판매자 또는 관리자만 수정 가능
    async fn update_product(
        &self,
        id: i64,
        changes: ProductChanges,
        caller: &Claims,
    ) -> Result<Product, AppError>;

    /// 판매자 또는 관리자만 삭제 가능. 상품의 입찰도 함께 삭제된다.
    async fn delete_product(&self, id: i64, caller: &Claims) -> Result<(), AppError>;

    /// 상품이 없으면 NotFound, 토큰의 사용자가 없으면 Unauthorized
    async fn create_bid(&self, bid: NewBid) -> Result<Bid, AppError>;

    /// 입찰자 또는 관리자만 삭제 가능
    async fn delete_bid(&self, id: i64, caller: &Claims) -> Result<(), AppError>;
}
