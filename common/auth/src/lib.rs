pub mod claims;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod gates;
pub mod pipeline;
pub mod policy;
pub mod roles;

pub use claims::Claims;
pub use codec::TokenCodec;
pub use config::{JwtConfig, DEFAULT_TOKEN_TTL_SECONDS};
pub use context::SecurityContext;
pub use error::{AuthError, AuthResult};
pub use gates::{parse_bearer, AuthenticationGate, AuthorizationGate, Gate};
pub use pipeline::{enforce, Pipeline, PipelineBuilder};
pub use policy::RoutePolicy;
pub use roles::{Role, UnknownRole, ROLE_CASHIER, ROLE_OWNER};
