use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use super::request_trace::TraceId;
use crate::auth::AuthenticatedIdentity;

/// Emits one `request_completed` event per request. 5xx log at error, 4xx at
/// warn, the rest at info. Query strings are never logged since `GET /users`
/// carries a user name there.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { inner: service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    inner: S,
}

struct Completion {
    trace_id: String,
    method: String,
    path: String,
    status: StatusCode,
    subject_id: Option<i64>,
    elapsed_ms: u128,
}

impl Completion {
    fn emit(&self) {
        let status = self.status.as_u16();
        let subject = self.subject_id.map(|id| id.to_string());
        let subject = subject.as_deref().unwrap_or("-");
        match self.status {
            s if s.is_server_error() => tracing::error!(
                trace_id = %self.trace_id, method = %self.method, path = %self.path,
                status, subject, elapsed_ms = self.elapsed_ms as u64, "request_completed"
            ),
            s if s.is_client_error() => tracing::warn!(
                trace_id = %self.trace_id, method = %self.method, path = %self.path,
                status, subject, elapsed_ms = self.elapsed_ms as u64, "request_completed"
            ),
            _ => tracing::info!(
                trace_id = %self.trace_id, method = %self.method, path = %self.path,
                status, subject, elapsed_ms = self.elapsed_ms as u64, "request_completed"
            ),
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let trace_id = TraceId::of(&req);
        let method = req.method().to_string();
        let path = req.path().to_string();
        let pending = self.inner.call(req);

        Box::pin(async move {
            let result = pending.await;

            let (status, subject_id) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request()
                        .extensions()
                        .get::<AuthenticatedIdentity>()
                        .map(|who| who.subject_id),
                ),
                Err(err) => (err.as_response_error().status_code(), None),
            };

            Completion {
                trace_id,
                method,
                path,
                status,
                subject_id,
                elapsed_ms: started.elapsed().as_millis(),
            }
            .emit();

            result
        })
    }
}
