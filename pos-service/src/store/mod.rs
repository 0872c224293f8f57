//! Persistence seams for users and sale orders.
//!
//! Every read filters out soft-deleted rows; callers never see a record
//! whose `deleted_at` is set.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{SaleOrder, User};
use crate::pagination::PageRequest;

pub mod memory;
pub mod postgres;

pub use memory::{MemorySaleOrderStore, MemoryUserStore};
pub use postgres::{PgSaleOrderStore, PgUserStore};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("stored row is invalid: {0}")]
    InvalidRow(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] when an active user already owns the email.
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Newest first, plus the total number of matching rows.
    async fn list_by_role(&self, role: Role, page: PageRequest) -> StoreResult<(Vec<User>, i64)>;

    /// Persists username, email, name, password hash and `updated_at`.
    async fn update(&self, user: &User) -> StoreResult<()>;

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;
}

#[async_trait]
pub trait SaleOrderStore: Send + Sync {
    async fn insert(&self, order: &SaleOrder) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<SaleOrder>>;

    async fn list(&self, page: PageRequest) -> StoreResult<(Vec<SaleOrder>, i64)>;

    /// Persists customer name, total, status and `updated_at`.
    async fn update(&self, order: &SaleOrder) -> StoreResult<()>;

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;
}
