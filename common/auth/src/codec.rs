use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use crate::claims::{Claims, ClaimsRepr};
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
/// Only the symmetric HMAC family is accepted on verification.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
const REQUIRED_CLAIMS: [&str; 5] = ["sub", "iss", "exp", "nbf", "iat"];

/// Mints and validates signed identity tokens.
///
/// Holds no mutable state; share it behind an `Arc` across requests.
#[derive(Clone)]
pub struct TokenCodec {
    config: JwtConfig,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret().is_empty() {
            return Err(AuthError::Configuration("signing secret must not be empty"));
        }
        if config.issuer.trim().is_empty() {
            return Err(AuthError::Configuration("issuer must not be empty"));
        }
        if config.ttl_seconds <= 0 {
            return Err(AuthError::Configuration("token ttl must be positive"));
        }
        let ttl = Duration::try_seconds(config.ttl_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(AuthError::Configuration("token ttl is out of range"))?;

        let encoding_key = EncodingKey::from_secret(config.secret());
        let decoding_key = DecodingKey::from_secret(config.secret());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);
        // nbf/exp are checked in `verify_at` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Ok(Self {
            config,
            ttl,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn issue(&self, subject: Uuid, role: Role) -> AuthResult<String> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issues a token whose validity window starts at `now`.
    pub fn issue_at(&self, subject: Uuid, role: Role, now: DateTime<Utc>) -> AuthResult<String> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Signing("expiry is out of range".into()))?;
        let claims = Claims {
            subject,
            role,
            issued_at: now,
            not_before: now,
            expires_at,
            issuer: self.config.issuer.clone(),
        };

        encode(
            &Header::new(SIGNING_ALGORITHM),
            &ClaimsRepr::from(&claims),
            &self.encoding_key,
        )
        .map_err(|err| AuthError::Signing(err.to_string()))
    }

    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let token_data = decode::<ClaimsRepr>(token, &self.decoding_key, &self.validation)?;
        let claims = Claims::try_from(token_data.claims)?;

        if !claims.is_within_window(now, self.config.leeway_seconds) {
            return Err(AuthError::InvalidToken(format!(
                "outside validity window [{}, {}]",
                claims.not_before, claims.expires_at
            )));
        }

        debug!(subject = %claims.subject, role = %claims.role, "verified token");
        Ok(claims)
    }
}
