use chrono::{DateTime, SecondsFormat, Utc};
use common_auth::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{SaleOrder, User};

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn require(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub name: String,
}

impl RegisterRequest {
    /// Checks required fields and returns the requested role.
    pub fn validate(&self) -> ServiceResult<Role> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        self.role
            .parse::<Role>()
            .map_err(|_| ServiceError::validation("role must be one of: owner, cashier"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body for both creating and updating a cashier.
#[derive(Debug, Clone, Deserialize)]
pub struct CashierRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

impl CashierRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            name: user.name,
            created_at: rfc3339(user.created_at),
            updated_at: rfc3339(user.updated_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleOrderRequest {
    pub customer_name: String,
    pub total_amount: f64,
    pub status: String,
}

impl SaleOrderRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        require("customer_name", &self.customer_name)?;
        require("status", &self.status)?;
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(ServiceError::validation(
                "total_amount must be a non-negative number",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SaleOrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SaleOrder> for SaleOrderResponse {
    fn from(order: SaleOrder) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer_name: order.customer_name,
            total_amount: order.total_amount,
            status: order.status,
            created_by: order.created_by,
            created_at: rfc3339(order.created_at),
            updated_at: rfc3339(order.updated_at),
        }
    }
}
