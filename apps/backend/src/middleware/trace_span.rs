//! Per-request tracing span.
//!
//! Reads the [`TraceId`] `RequestTrace` stored in the request extensions, so
//! it must be wrapped inside `RequestTrace` (registered before it in
//! `App::wrap`). Websocket upgrades get their own span name; the session
//! actor outlives the request, so only the upgrade handshake runs inside it.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument};

use super::Surface;
use crate::trace_ctx::TraceId;

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(ToString::to_string)
            .unwrap_or_else(|| "missing-trace-id".to_string());
        let span = match Surface::of(req.path()) {
            Surface::Websocket => info_span!("ws_upgrade", %trace_id),
            surface => info_span!(
                "request",
                %trace_id,
                surface = surface.as_str(),
                method = %req.method(),
                path = %req.path()
            ),
        };

        Box::pin(self.service.call(req).instrument(span))
    }
}
