//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

/// Path prefixes whose final segment is a secret token.
const TOKEN_PATH_PREFIXES: &[&str] = &["/auth/verify-email/"];

type MakeSpanFn = fn(&Request<Body>) -> Span;

/// Creates a tracing middleware for HTTP requests.
///
/// Each request gets an `INFO` span with method, path and HTTP version;
/// responses are logged with status and latency in milliseconds. Query
/// strings are dropped and token path segments are redacted.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST path=/url/shorten-url version=HTTP/1.1}: finished processing request latency=12 ms status=201
/// INFO request{method=GET path=/auth/verify-email/*** version=HTTP/1.1}: finished processing request latency=4 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpanFn)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %redact_path(request.uri().path()),
        version = ?request.version(),
    )
}

/// Replaces token path segments with `***`.
pub(crate) fn redact_path(path: &str) -> String {
    for prefix in TOKEN_PATH_PREFIXES {
        if path.starts_with(prefix) {
            return format!("{prefix}***");
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_path_hides_tokens() {
        assert_eq!(
            redact_path("/auth/verify-email/eyJhbGciOi.abc.def"),
            "/auth/verify-email/***"
        );
    }

    #[test]
    fn test_redact_path_keeps_other_paths() {
        assert_eq!(redact_path("/url/shortUrl/AbCdEfGh"), "/url/shortUrl/AbCdEfGh");
        assert_eq!(redact_path("/auth/login"), "/auth/login");
    }
}
