//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

use crate::Error;

/// The number of bytes of a request or response body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that the server will read.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Request bodies larger than [REQUEST_BODY_LIMIT] bytes are rejected with
/// `413 Payload Too Large` before they reach a handler.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match read_body(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => return reject_request_body(&parts, error),
    };
    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, limit).await
}

fn reject_request_body(parts: &axum::http::request::Parts, error: axum::Error) -> Response {
    let method = &parts.method;
    let uri = &parts.uri;
    let error = error.into_inner();

    if error.is::<LengthLimitError>() {
        tracing::warn!("Rejected request: {method} {uri}\nbody exceeds {REQUEST_BODY_LIMIT} bytes");
        return Error::PayloadTooLarge.into_response();
    }

    tracing::warn!("could not read request body for {method} {uri}: {error}");
    StatusCode::BAD_REQUEST.into_response()
}

/// Cut `body` down to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a character.
fn truncate_body(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    Some(&body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;

    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Received request: {method} {uri}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let status = parts.status;

    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {status}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod truncate_body_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncate_body};

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate_body("{\"name\":\"Coffee\"}"), None);
    }

    #[test]
    fn long_body_is_truncated_to_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let truncated = truncate_body(&body).expect("body should be truncated");

        assert_eq!(truncated.len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn does_not_split_multibyte_characters() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate_body(&body).expect("body should be truncated");

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(truncated.chars().all(|c| c == 'é'));
    }
}

#[cfg(test)]
mod logging_middleware_tests {
    use axum::{Router, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use super::{REQUEST_BODY_LIMIT, logging_middleware};

    async fn echo(body: String) -> String {
        body
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn request_and_response_bodies_pass_through() {
        let server = get_test_server();
        let long_body = "x".repeat(500);

        let response = server.post("/echo").text(&long_body).await;

        response.assert_status_ok();
        response.assert_text(long_body);
    }

    #[tokio::test]
    async fn body_at_limit_passes_through() {
        let server = get_test_server();
        let body = "x".repeat(REQUEST_BODY_LIMIT);

        let response = server.post("/echo").text(&body).await;

        response.assert_status_ok();
        assert_eq!(response.text().len(), REQUEST_BODY_LIMIT);
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let server = get_test_server();
        let body = "x".repeat(REQUEST_BODY_LIMIT + 1);

        let response = server.post("/echo").text(&body).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({"message": "Request body is too large"}));
    }
}
