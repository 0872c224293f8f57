pub mod app;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod models;
pub mod pagination;
pub mod passwords;
pub mod routes;
pub mod sale_order_handlers;
pub mod sale_order_service;
pub mod store;
pub mod telemetry;
pub mod user_handlers;
pub mod user_service;

pub use app::AppState;
pub use routes::{build_router, route_policy, API_PREFIX};

/// Embedded schema migrations, applied at startup and by the store tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
