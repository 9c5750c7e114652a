use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::Surface;
use crate::error::AppError;
use crate::trace_ctx::TraceId;

/// One log line per request, level chosen by status class.
///
/// Failed requests carry the wire `error_code` of the `AppError` behind
/// them. A websocket upgrade is logged once when the socket opens; the
/// session actor logs the rest of its life.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

fn app_error_code(err: &ActixError) -> Option<&'static str> {
    err.as_error::<AppError>().map(|e| e.code().as_str())
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let surface = Surface::of(&path).as_str();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let (status, error_code) = match &result {
                Ok(res) => (res.status(), res.response().error().and_then(app_error_code)),
                Err(err) => (err.as_response_error().status_code(), app_error_code(err)),
            };

            if status == StatusCode::SWITCHING_PROTOCOLS {
                info!(%trace_id, surface, "websocket opened");
                return result;
            }

            let status_code = status.as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;
            if status.is_server_error() {
                error!(%method, %path, surface, status_code, error_code, duration_ms, %trace_id, "request failed");
            } else if status.is_client_error() {
                warn!(%method, %path, surface, status_code, error_code, duration_ms, %trace_id, "request rejected");
            } else {
                info!(%method, %path, surface, status_code, duration_ms, %trace_id, "request completed");
            }

            result
        })
    }
}
