use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::TokenCodec;
use sqlx::PgPool;

use crate::metrics::PosMetrics;
use crate::sale_order_service::SaleOrderService;
use crate::store::{PgSaleOrderStore, PgUserStore, SaleOrderStore, UserStore};
use crate::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub sale_orders: SaleOrderService,
    pub codec: Arc<TokenCodec>,
    pub metrics: Arc<PosMetrics>,
}

impl AppState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        sale_order_store: Arc<dyn SaleOrderStore>,
        codec: Arc<TokenCodec>,
        metrics: Arc<PosMetrics>,
    ) -> Self {
        Self {
            users: UserService::new(user_store, codec.clone()),
            sale_orders: SaleOrderService::new(sale_order_store),
            codec,
            metrics,
        }
    }

    pub fn with_postgres(db: PgPool, codec: Arc<TokenCodec>, metrics: Arc<PosMetrics>) -> Self {
        Self::new(
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgSaleOrderStore::new(db)),
            codec,
            metrics,
        )
    }

    pub fn record_login_metric(&self, outcome: &str) {
        self.metrics.login_attempt(outcome);
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for SaleOrderService {
    fn from_ref(state: &AppState) -> Self {
        state.sale_orders.clone()
    }
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl FromRef<AppState> for Arc<PosMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}
