use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::codec::TokenCodec;
use crate::error::{AuthError, AuthResult};
use crate::gates::{AuthenticationGate, AuthorizationGate, Gate};
use crate::roles::Role;

type RejectObserver = Arc<dyn Fn(&AuthError) + Send + Sync>;

/// Ordered list of gates run in front of a handler.
///
/// Mounted with `axum::middleware::from_fn_with_state(pipeline, enforce)`.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<dyn Gate>]>,
    on_reject: Option<RejectObserver>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Authentication followed by authorization against `allowed`.
    pub fn guarded(codec: Arc<TokenCodec>, allowed: impl Into<Vec<Role>>) -> PipelineBuilder {
        Self::builder()
            .stage(AuthenticationGate::new(codec))
            .stage(AuthorizationGate::new(allowed))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs every stage in order and stops at the first rejection.
    pub fn run(&self, parts: &mut Parts) -> AuthResult<()> {
        for stage in self.stages.iter() {
            if let Err(err) = stage.handle(parts) {
                warn!(
                    stage = stage.name(),
                    kind = err.kind(),
                    method = %parts.method,
                    path = %parts.uri.path(),
                    error = %err,
                    "request rejected"
                );
                if let Some(observer) = &self.on_reject {
                    observer(&err);
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Gate>>,
    on_reject: Option<RejectObserver>,
}

impl PipelineBuilder {
    pub fn stage<G>(mut self, gate: G) -> Self
    where
        G: Gate + 'static,
    {
        self.stages.push(Arc::new(gate));
        self
    }

    /// Called once for every rejected request, after logging.
    pub fn on_reject<F>(mut self, observer: F) -> Self
    where
        F: Fn(&AuthError) + Send + Sync + 'static,
    {
        self.on_reject = Some(Arc::new(observer));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages.into(),
            on_reject: self.on_reject,
        }
    }
}

/// Middleware entry point: the handler only runs if every stage passes.
pub async fn enforce(State(pipeline): State<Pipeline>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    match pipeline.run(&mut parts) {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(err) => err.into_response(),
    }
}
