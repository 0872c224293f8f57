use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put, MethodRouter};
use axum::Router;
use common_auth::{enforce, Pipeline, Role, RoutePolicy, TokenCodec};
use common_http_errors::ApiError;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics::PosMetrics;
use crate::sale_order_handlers::{
    create_sale_order, delete_sale_order, get_sale_order, list_sale_orders, update_sale_order,
};
use crate::user_handlers::{
    create_cashier, delete_cashier, get_cashier, list_cashiers, login, logout, register,
    update_cashier,
};
use crate::AppState;

pub const API_PREFIX: &str = "/api/v1";

const STAFF: &[Role] = &[Role::Cashier, Role::Owner];
const OWNER_ONLY: &[Role] = &[Role::Owner];

/// Allow-lists for every gated route, keyed by path relative to [`API_PREFIX`].
pub fn route_policy() -> RoutePolicy {
    RoutePolicy::new()
        .allow(Method::POST, "/auth/logout", &[])
        .allow(Method::GET, "/sale-orders", STAFF)
        .allow(Method::POST, "/sale-orders", STAFF)
        .allow(Method::GET, "/sale-orders/:id", STAFF)
        .allow(Method::PUT, "/sale-orders/:id", STAFF)
        .allow(Method::DELETE, "/sale-orders/:id", STAFF)
        .allow(Method::GET, "/users/cashier", OWNER_ONLY)
        .allow(Method::POST, "/users/cashier", OWNER_ONLY)
        .allow(Method::GET, "/users/cashier/:id", OWNER_ONLY)
        .allow(Method::PUT, "/users/cashier/:id", OWNER_ONLY)
        .allow(Method::DELETE, "/users/cashier/:id", OWNER_ONLY)
}

/// Wraps individual method routes in an authentication + authorization pipeline.
struct Guard<'a> {
    codec: Arc<TokenCodec>,
    metrics: Arc<PosMetrics>,
    policy: &'a RoutePolicy,
    used: HashSet<(Method, String)>,
}

impl<'a> Guard<'a> {
    fn new(state: &AppState, policy: &'a RoutePolicy) -> Self {
        Self {
            codec: state.codec.clone(),
            metrics: state.metrics.clone(),
            policy,
            used: HashSet::new(),
        }
    }

    fn secure(
        &mut self,
        method: Method,
        path: &str,
        route: MethodRouter<AppState>,
    ) -> Result<MethodRouter<AppState>> {
        let allowed = self
            .policy
            .roles_for(&method, path)
            .ok_or_else(|| anyhow!("no access policy registered for {method} {path}"))?;

        let metrics = self.metrics.clone();
        let pipeline = Pipeline::guarded(self.codec.clone(), allowed.to_vec())
            .on_reject(move |err| metrics.auth_rejection(err.kind()))
            .build();

        self.used.insert((method, path.to_string()));
        Ok(route.route_layer(from_fn_with_state(pipeline, enforce)))
    }

    /// Every policy entry must correspond to a mounted route.
    fn finish(self) -> Result<()> {
        let stale: Vec<String> = self
            .policy
            .iter()
            .filter(|(method, path, _)| {
                !self.used.contains(&((*method).clone(), path.to_string()))
            })
            .map(|(method, path, _)| format!("{method} {path}"))
            .collect();
        if stale.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("access policy names unknown routes: {}", stale.join(", ")))
        }
    }
}

pub fn build_router(state: AppState, policy: &RoutePolicy) -> Result<Router> {
    let mut guard = Guard::new(&state, policy);

    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route(
            "/auth/logout",
            guard.secure(Method::POST, "/auth/logout", post(logout))?,
        )
        .route(
            "/sale-orders",
            guard.secure(Method::GET, "/sale-orders", get(list_sale_orders))?,
        )
        .route(
            "/sale-orders",
            guard.secure(Method::POST, "/sale-orders", post(create_sale_order))?,
        )
        .route(
            "/sale-orders/:id",
            guard.secure(Method::GET, "/sale-orders/:id", get(get_sale_order))?,
        )
        .route(
            "/sale-orders/:id",
            guard.secure(Method::PUT, "/sale-orders/:id", put(update_sale_order))?,
        )
        .route(
            "/sale-orders/:id",
            guard.secure(Method::DELETE, "/sale-orders/:id", delete(delete_sale_order))?,
        )
        .route(
            "/users/cashier",
            guard.secure(Method::GET, "/users/cashier", get(list_cashiers))?,
        )
        .route(
            "/users/cashier",
            guard.secure(Method::POST, "/users/cashier", post(create_cashier))?,
        )
        .route(
            "/users/cashier/:id",
            guard.secure(Method::GET, "/users/cashier/:id", get(get_cashier))?,
        )
        .route(
            "/users/cashier/:id",
            guard.secure(Method::PUT, "/users/cashier/:id", put(update_cashier))?,
        )
        .route(
            "/users/cashier/:id",
            guard.secure(Method::DELETE, "/users/cashier/:id", delete(delete_cashier))?,
        );

    guard.finish()?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION]);

    Ok(Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .with_state(state)
        .layer(cors))
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(metrics): State<Arc<PosMetrics>>) -> Response {
    match metrics.render() {
        Ok(response) => response,
        Err(err) => ApiError::internal(err).into_response(),
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
