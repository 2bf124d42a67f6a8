/// 메모리 저장소
/// DATABASE_URL 이 없을 때 사용된다. 모든 작업은 하나의 락 안에서 수행된다.
// region:    --- Imports
use super::{MarketStore, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::auth::model::{NewUser, User, UserSummary};
use crate::auth::Claims;
use crate::bidding::model::{Bid, NewBid};
use crate::catalog::model::{NewProduct, Product, ProductChanges, ProductView};
use crate::error::AppError;
use crate::policy::can_modify;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

// endregion: --- Imports

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    products: BTreeMap<i64, Product>,
    bids: BTreeMap<i64, Bid>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn view(&self, product: &Product) -> ProductView {
        ProductView {
            product: product.clone(),
            seller: self.users.get(&product.seller_id).map(UserSummary::from),
            bids: self
                .bids
                .values()
                .filter(|bid| bid.product_id == product.id)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let user = User {
            id: tables.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            admin: user.admin,
        };
        tables.users.insert(user.id, user.clone());
        debug!("{:<12} --> 사용자 저장 id: {}", "Store", user.id);
        Ok(user)
    }

    async fn email_taken(&self, email: &str) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_products(&self) -> Result<Vec<ProductView>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().map(|p| tables.view(p)).collect())
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductView>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).map(|p| tables.view(p)))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&product.seller_id) {
            return Err(AppError::Unauthorized);
        }

        let product = Product {
            id: tables.next_id(),
            name: product.name,
            description: product.description,
            category: product.category,
            original_price: product.original_price,
            picture_url: product.picture_url,
            end_date: product.end_date,
            seller_id: product.seller_id,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        changes: ProductChanges,
        caller: &Claims,
    ) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(AppError::NotFound("Product"))?;
        if !can_modify(product.seller_id, caller) {
            return Err(AppError::Forbidden);
        }

        changes.apply(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64, caller: &Claims) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let seller_id = tables
            .products
            .get(&id)
            .map(|p| p.seller_id)
            .ok_or(AppError::NotFound("Product"))?;
        if !can_modify(seller_id, caller) {
            return Err(AppError::Forbidden);
        }

        tables.products.remove(&id);
        tables.bids.retain(|_, bid| bid.product_id != id);
        Ok(())
    }

    async fn create_bid(&self, bid: NewBid) -> Result<Bid, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&bid.product_id) {
            return Err(AppError::NotFound("Product"));
        }
        if !tables.users.contains_key(&bid.bidder_id) {
            return Err(AppError::Unauthorized);
        }

        let bid = Bid {
            id: tables.next_id(),
            product_id: bid.product_id,
            bidder_id: bid.bidder_id,
            price: bid.price,
            date: bid.date,
        };
        tables.bids.insert(bid.id, bid.clone());
        Ok(bid)
    }

    async fn delete_bid(&self, id: i64, caller: &Claims) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let bidder_id = tables
            .bids
            .get(&id)
            .map(|b| b.bidder_id)
            .ok_or(AppError::NotFound("Bid"))?;
        if !can_modify(bidder_id, caller) {
            return Err(AppError::Forbidden);
        }

        tables.bids.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_user(name: &str, admin: bool) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@x.com", name),
            password_hash: "$argon2id$stub".to_string(),
            admin,
        }
    }

    fn new_product(seller_id: i64) -> NewProduct {
        NewProduct {
            name: "Lamp".to_string(),
            description: "Brass".to_string(),
            category: None,
            original_price: 10.0,
            picture_url: None,
            end_date: None,
            seller_id,
        }
    }

    #[tokio::test]
    async fn deleting_product_cascades_to_bids() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("seller", false)).await.unwrap();
        let bidder = store.create_user(new_user("bidder", false)).await.unwrap();
        let product = store.create_product(new_product(seller.id)).await.unwrap();
        let bid = store
            .create_bid(NewBid {
                product_id: product.id,
                bidder_id: bidder.id,
                price: 11.0,
                date: Utc::now(),
            })
            .await
            .unwrap();

        let view = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(view.bids, vec![bid.clone()]);
        assert_eq!(view.seller.unwrap().id, seller.id);

        let caller = Claims::for_user(&seller);
        store.delete_product(product.id, &caller).await.unwrap();

        let bidder_claims = Claims::for_user(&bidder);
        assert!(matches!(
            store.delete_bid(bid.id, &bidder_claims).await,
            Err(AppError::NotFound("Bid"))
        ));
    }

    #[tokio::test]
    async fn bid_on_missing_product_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .create_bid(NewBid {
                product_id: 404,
                bidder_id: 1,
                price: 1.0,
                date: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));
    }

    #[tokio::test]
    async fn bid_from_unknown_user_is_unauthorized() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("seller", false)).await.unwrap();
        let product = store.create_product(new_product(seller.id)).await.unwrap();

        let err = store
            .create_bid(NewBid {
                product_id: product.id,
                bidder_id: 999,
                price: 12.0,
                date: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(store.get_product(product.id).await.unwrap().unwrap().bids.is_empty());
    }

    #[tokio::test]
    async fn email_taken_reflects_stored_users() {
        let store = MemoryStore::new();
        assert!(!store.email_taken("seller@x.com").await.unwrap());
        store.create_user(new_user("seller", false)).await.unwrap();
        assert!(store.email_taken("seller@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn update_is_guarded_by_ownership() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("seller", false)).await.unwrap();
        let stranger = store.create_user(new_user("stranger", false)).await.unwrap();
        let admin = store.create_user(new_user("root", true)).await.unwrap();
        let product = store.create_product(new_product(seller.id)).await.unwrap();

        let changes = ProductChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store
                .update_product(product.id, changes.clone(), &Claims::for_user(&stranger))
                .await,
            Err(AppError::Forbidden)
        ));

        let updated = store
            .update_product(product.id, changes, &Claims::for_user(&admin))
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.seller_id, seller.id);
    }
}
