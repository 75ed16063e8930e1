//! Wraps each request in an `http_request` span so handler, service and repo
//! events carry the trace id without passing it around.
//!
//! Must run inside [`RequestTrace`](super::RequestTrace), i.e. be `.wrap`ped
//! before it.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use tracing::Instrument;

use super::request_trace::TraceId;

#[derive(Clone, Copy, Default)]
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
        ready(Ok(TraceSpanMiddleware { inner: service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    inner: S,
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

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Route pattern, not the concrete path, so `/users/{id}` groups together.
        let route = req
            .match_pattern()
            .unwrap_or_else(|| req.path().to_string());
        let span = tracing::info_span!(
            "http_request",
            trace_id = %TraceId::of(&req),
            method = %req.method(),
            route = %route,
        );

        Box::pin(self.inner.call(req).instrument(span))
    }
}
