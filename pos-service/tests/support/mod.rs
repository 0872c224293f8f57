// Shared by several test binaries; each uses a different subset.
#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use common_auth::{JwtConfig, Role, TokenCodec};
use http_body_util::BodyExt;
use pos_service::dto::RegisterRequest;
use pos_service::metrics::PosMetrics;
use pos_service::store::{MemorySaleOrderStore, MemoryUserStore};
use pos_service::{build_router, route_policy, AppState, MIGRATOR};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "pos-integration-secret";
pub const TEST_ISSUER: &str = "pos-backend";
pub const TEST_PASSWORD: &str = "CorrectHorseBatteryStaple!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub codec: Arc<TokenCodec>,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    pub fn error_code(&self) -> Option<&str> {
        self.headers
            .get("X-Error-Code")
            .and_then(|value| value.to_str().ok())
    }
}

pub struct Seeded {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let codec = Arc::new(
            TokenCodec::new(JwtConfig::new(TEST_SECRET, TEST_ISSUER)).expect("codec"),
        );
        let metrics = Arc::new(PosMetrics::new().expect("metrics"));
        let state = AppState::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySaleOrderStore::new()),
            codec.clone(),
            metrics,
        );
        let router = build_router(state.clone(), &route_policy()).expect("router");
        Self {
            router,
            state,
            codec,
        }
    }

    /// Registers a user directly through the service and mints a token for it.
    pub async fn seed(&self, role: Role, email: &str) -> Seeded {
        let user = self
            .state
            .users
            .register(RegisterRequest {
                username: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                role: role.as_str().to_string(),
                name: format!("{role} user"),
            })
            .await
            .expect("seed user");
        let token = self.codec.issue(user.id, user.role).expect("token");
        Seeded {
            id: user.id,
            email: user.email,
            token,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn raw_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// External Postgres for the store tests, selected with `POS_TEST_DATABASE_URL`.
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    pub async fn setup() -> Result<Option<Self>> {
        let Ok(database_url) = env::var("POS_TEST_DATABASE_URL") else {
            eprintln!("Skipping pos-service store tests: set POS_TEST_DATABASE_URL to run them.");
            return Ok(None);
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;
        MIGRATOR.run(&pool).await?;

        Ok(Some(Self { pool }))
    }

    pub fn pool_clone(&self) -> PgPool {
        self.pool.clone()
    }
}
