use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::roles::Role;

/// Identity established by [`crate::AuthenticationGate`] for a single request.
///
/// Stored in the request extensions; handlers take it as an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityContext {
    pub subject_id: Uuid,
    pub role: Role,
}

impl SecurityContext {
    pub fn new(subject_id: Uuid, role: Role) -> Self {
        Self { subject_id, role }
    }
}

impl From<&Claims> for SecurityContext {
    fn from(value: &Claims) -> Self {
        Self::new(value.subject, value.role)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .copied()
            .ok_or(AuthError::MissingIdentityContext)
    }
}
