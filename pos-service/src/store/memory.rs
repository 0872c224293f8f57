use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SaleOrderStore, StoreError, StoreResult, UserStore};
use crate::models::{SaleOrder, User};
use crate::pagination::PageRequest;

/// Process-local user store with the same visibility rules as [`super::PgUserStore`].
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
        users
            .values()
            .any(|user| user.is_active() && user.email == email && Some(user.id) != except)
    }
}

fn page_of<T: Clone>(mut items: Vec<T>, page: PageRequest) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    let data = if start >= items.len() {
        Vec::new()
    } else {
        items.drain(start..).take(limit).collect()
    };
    (data, total)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if Self::email_taken(&users, &user.email, None) {
            return Err(StoreError::UniqueViolation("users_email_active_idx".into()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.is_active() && user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|user| user.is_active()).cloned())
    }

    async fn list_by_role(&self, role: Role, page: PageRequest) -> StoreResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut matching: Vec<User> = users
            .values()
            .filter(|user| user.is_active() && user.role == role)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(matching, page))
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if Self::email_taken(&users, &user.email, Some(user.id)) {
            return Err(StoreError::UniqueViolation("users_email_active_idx".into()));
        }
        let stored = users
            .get_mut(&user.id)
            .filter(|stored| stored.is_active())
            .ok_or(StoreError::NotFound)?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.name = user.name.clone();
        stored.password_hash = user.password_hash.clone();
        stored.updated_at = user.updated_at;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&id)
            .filter(|stored| stored.is_active())
            .ok_or(StoreError::NotFound)?;
        stored.deleted_at = Some(at);
        stored.updated_at = at;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySaleOrderStore {
    orders: RwLock<HashMap<Uuid, SaleOrder>>,
}

impl MemorySaleOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaleOrderStore for MemorySaleOrderStore {
    async fn insert(&self, order: &SaleOrder) -> StoreResult<()> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<SaleOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).filter(|order| order.is_active()).cloned())
    }

    async fn list(&self, page: PageRequest) -> StoreResult<(Vec<SaleOrder>, i64)> {
        let orders = self.orders.read().await;
        let mut active: Vec<SaleOrder> = orders
            .values()
            .filter(|order| order.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(active, page))
    }

    async fn update(&self, order: &SaleOrder) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get_mut(&order.id)
            .filter(|stored| stored.is_active())
            .ok_or(StoreError::NotFound)?;
        stored.customer_name = order.customer_name.clone();
        stored.total_amount = order.total_amount;
        stored.status = order.status.clone();
        stored.updated_at = order.updated_at;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get_mut(&id)
            .filter(|stored| stored.is_active())
            .ok_or(StoreError::NotFound)?;
        stored.deleted_at = Some(at);
        stored.updated_at = at;
        Ok(())
    }
}
