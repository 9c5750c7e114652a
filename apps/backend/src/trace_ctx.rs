//! Request trace ids.
//!
//! `RequestTrace` mints a [`TraceId`], stores it in the request extensions
//! for the other middleware, and scopes the request future with it so
//! problem+json bodies can echo it without threading it through handlers.

use std::fmt;
use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trace id of the current request, or "unknown" outside a request scope.
pub fn trace_id() -> String {
    CURRENT
        .try_with(|id| id.to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

pub async fn with_trace_id<F, R>(trace_id: TraceId, future: F) -> R
where
    F: Future<Output = R>,
{
    CURRENT.scope(trace_id, future).await
}
