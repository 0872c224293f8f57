use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{SaleOrderStore, StoreError, StoreResult, UserStore};
use crate::models::{SaleOrder, User};
use crate::pagination::PageRequest;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, name, created_at, updated_at, deleted_at";
const SALE_ORDER_COLUMNS: &str = "id, order_number, customer_name, total_amount, status, created_by, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|err| StoreError::InvalidRow(format!("user {}: {err}", row.id)))?;
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::UniqueViolation(db_err.constraint().unwrap_or("unique").to_string())
        }
        _ => StoreError::Database(err),
    }
}

fn expect_one_row(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, name, created_at, updated_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn list_by_role(&self, role: Role, page: PageRequest) -> StoreResult<(Vec<User>, i64)> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(role.as_str())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE role = $1 AND deleted_at IS NULL",
        )
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((users, total))
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, email = $2, name = $3, password_hash = $4, updated_at = $5
             WHERE id = $6 AND deleted_at IS NULL",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;
        expect_one_row(result.rows_affected())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(at)
        .bind(id)
        .execute(&self.db)
        .await?;
        expect_one_row(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgSaleOrderStore {
    db: PgPool,
}

impl PgSaleOrderStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct SaleOrderRow {
    id: Uuid,
    order_number: String,
    customer_name: String,
    total_amount: f64,
    status: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<SaleOrderRow> for SaleOrder {
    fn from(row: SaleOrderRow) -> Self {
        SaleOrder {
            id: row.id,
            order_number: row.order_number,
            customer_name: row.customer_name,
            total_amount: row.total_amount,
            status: row.status,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl SaleOrderStore for PgSaleOrderStore {
    async fn insert(&self, order: &SaleOrder) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sale_orders (id, order_number, customer_name, total_amount, status, created_by, created_at, updated_at, deleted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(&order.customer_name)
        .bind(order.total_amount)
        .bind(&order.status)
        .bind(order.created_by)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.deleted_at)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<SaleOrder>> {
        let row = sqlx::query_as::<_, SaleOrderRow>(&format!(
            "SELECT {SALE_ORDER_COLUMNS} FROM sale_orders WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(SaleOrder::from))
    }

    async fn list(&self, page: PageRequest) -> StoreResult<(Vec<SaleOrder>, i64)> {
        let rows = sqlx::query_as::<_, SaleOrderRow>(&format!(
            "SELECT {SALE_ORDER_COLUMNS} FROM sale_orders
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_orders WHERE deleted_at IS NULL")
                .fetch_one(&self.db)
                .await?;

        Ok((rows.into_iter().map(SaleOrder::from).collect(), total))
    }

    async fn update(&self, order: &SaleOrder) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE sale_orders SET customer_name = $1, total_amount = $2, status = $3, updated_at = $4
             WHERE id = $5 AND deleted_at IS NULL",
        )
        .bind(&order.customer_name)
        .bind(order.total_amount)
        .bind(&order.status)
        .bind(order.updated_at)
        .bind(order.id)
        .execute(&self.db)
        .await?;
        expect_one_row(result.rows_affected())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE sale_orders SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(at)
        .bind(id)
        .execute(&self.db)
        .await?;
        expect_one_row(result.rows_affected())
    }
}
