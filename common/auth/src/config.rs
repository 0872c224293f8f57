use std::fmt;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Immutable signing configuration handed to [`crate::TokenCodec`] at construction.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    /// Expected issuer claim (iss).
    pub issuer: String,
    /// Lifetime of an issued token.
    pub ttl_seconds: i64,
    /// Allowable clock skew in seconds when checking nbf/exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with a 24 hour lifetime and no leeway.
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            leeway_seconds: 0,
        }
    }

    pub fn with_ttl(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}
