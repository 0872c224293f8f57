use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Application-focused representation of verified token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub subject: Uuid,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub issuer: String,
}

impl Claims {
    pub fn is_within_window(&self, now: DateTime<Utc>, leeway_seconds: u32) -> bool {
        let leeway = chrono::Duration::seconds(i64::from(leeway_seconds));
        self.not_before <= now + leeway && now - leeway <= self.expires_at
    }
}

/// Wire shape of the signed payload.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClaimsRepr {
    pub(crate) sub: String,
    pub(crate) role: String,
    pub(crate) iat: i64,
    pub(crate) nbf: i64,
    pub(crate) exp: i64,
    pub(crate) iss: String,
}

impl From<&Claims> for ClaimsRepr {
    fn from(value: &Claims) -> Self {
        Self {
            sub: value.subject.to_string(),
            role: value.role.as_str().to_string(),
            iat: value.issued_at.timestamp(),
            nbf: value.not_before.timestamp(),
            exp: value.expires_at.timestamp(),
            iss: value.issuer.clone(),
        }
    }
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let subject = Uuid::parse_str(&value.sub)
            .map_err(|_| AuthError::InvalidToken(format!("invalid sub '{}'", value.sub)))?;
        let role = value
            .role
            .parse::<Role>()
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;

        Ok(Self {
            subject,
            role,
            issued_at: timestamp("iat", value.iat)?,
            not_before: timestamp("nbf", value.nbf)?,
            expires_at: timestamp("exp", value.exp)?,
            issuer: value.iss,
        })
    }
}

fn timestamp(claim: &'static str, seconds: i64) -> AuthResult<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| AuthError::InvalidToken(format!("invalid {claim} '{seconds}'")))
}
