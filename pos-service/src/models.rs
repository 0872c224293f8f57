use chrono::{DateTime, Utc};
use common_auth::Role;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleOrder {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SaleOrder {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Order numbers are derived from the creation second.
pub fn order_number_at(at: DateTime<Utc>) -> String {
    format!("SO-{}", at.timestamp())
}
