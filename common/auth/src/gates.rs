use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::codec::TokenCodec;
use crate::context::SecurityContext;
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

const BEARER_SCHEME: &str = "Bearer";

/// A single named stage of a [`crate::Pipeline`].
///
/// A gate either lets the request continue (optionally annotating `parts`)
/// or rejects it. Gates never see the body.
pub trait Gate: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, parts: &mut Parts) -> AuthResult<()>;
}

/// Extracts the token from an `Authorization` value of the exact form `Bearer <token>`.
pub fn parse_bearer(raw: &str) -> AuthResult<&str> {
    let mut segments = raw.split(' ');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedAuthHeader),
    }
}

/// Verifies the bearer token and records the caller's identity.
#[derive(Clone)]
pub struct AuthenticationGate {
    codec: Arc<TokenCodec>,
}

impl AuthenticationGate {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl Gate for AuthenticationGate {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn handle(&self, parts: &mut Parts) -> AuthResult<()> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MalformedAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::MalformedAuthHeader)?;

        let token = parse_bearer(header)?;
        let claims = self.codec.verify(token)?;

        parts.extensions.insert(SecurityContext::from(&claims));
        Ok(())
    }
}

/// Checks the authenticated role against the route's allow-list.
///
/// An empty allow-list admits every request, with or without an identity.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationGate {
    allowed: Vec<Role>,
}

impl AuthorizationGate {
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: allowed.into(),
        }
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }
}

impl Gate for AuthorizationGate {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn handle(&self, parts: &mut Parts) -> AuthResult<()> {
        if self.allowed.is_empty() {
            return Ok(());
        }

        let context = parts
            .extensions
            .get::<SecurityContext>()
            .ok_or(AuthError::MissingIdentityContext)?;

        if self.allowed.contains(&context.role) {
            Ok(())
        } else {
            Err(AuthError::RoleNotPermitted {
                role: context.role,
                allowed: self.allowed.clone(),
            })
        }
    }
}
