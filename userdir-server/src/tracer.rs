use axum::{
    body::Body,
    http::{Request, Response},
};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::{DefaultOnBodyChunk, DefaultOnEos, MakeSpan, TraceLayer};
use tracing::{Span, error, info};

use crate::middleware::request_context::RequestContext;

// The fully-specified trace layer type, spelled out once so the router
// assembly stays readable.
type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpanFactory,
    fn(&Request<Body>, &Span) -> (),
    fn(&Response<Body>, Duration, &Span) -> (),
    DefaultOnBodyChunk,
    DefaultOnEos,
    fn(ServerErrorsFailureClass, Duration, &Span) -> (),
>;

/// Builds one span per HTTP request, carrying the correlation id assigned by
/// the request-id middleware so every log line within a request shares it.
#[derive(Clone, Default)]
pub(crate) struct RequestSpanFactory;

fn correlation_id<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<RequestContext>()
        .map_or_else(|| "unassigned".into(), |ctx| ctx.request_id.clone())
}

impl<B> MakeSpan<B> for RequestSpanFactory {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %correlation_id(request),
            // Filled in by on_response once the status is known.
            status_code = tracing::field::Empty
        )
    }
}

pub(crate) fn on_request(request: &Request<Body>, span: &Span) {
    span.in_scope(|| {
        info!(version = ?request.version(), "request received");
    });
}

pub(crate) fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status_code", response.status().as_u16());
    span.in_scope(|| {
        info!(status = %response.status(), latency = ?latency, "request completed");
    });
}

pub(crate) fn on_failure(failure: ServerErrorsFailureClass, latency: Duration, span: &Span) {
    span.in_scope(|| {
        error!(failure = %failure, latency = ?latency, "request failed");
    });
}

/// Trace layer wired with the handlers above. Applied after the request-id
/// middleware so the span sees the assigned id.
pub fn create_trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpanFactory)
        .on_request(on_request as fn(&Request<Body>, &Span))
        .on_response(on_response as fn(&Response<Body>, Duration, &Span))
        .on_failure(on_failure as fn(ServerErrorsFailureClass, Duration, &Span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_reads_the_request_context() {
        let mut request = Request::new(());
        request.extensions_mut().insert(RequestContext {
            request_id: "req-123".to_string(),
        });

        assert_eq!(correlation_id(&request), "req-123");
    }

    #[test]
    fn correlation_id_falls_back_when_context_is_absent() {
        let request = Request::new(());
        assert_eq!(correlation_id(&request), "unassigned");
    }
}
