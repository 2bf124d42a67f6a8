use crate::auth::TokenService;
use crate::store::MarketStore;
use std::sync::Arc;

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }
}
