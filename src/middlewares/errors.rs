use crate::errors::ApiError;
use axum::{
    body::{to_bytes, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sentry::{
    protocol::{Event, Exception},
    Breadcrumb, Level,
};
use std::any::Any;
use std::convert::Infallible;

/// Turns a handler panic into a 500 response; `error_middleware` then
/// replaces its body with the generic message.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::internal_server_error(format!("Handler panicked: {detail}")).into_response()
}

pub async fn error_middleware(request: Request, next: Next) -> Result<Response, Infallible> {
    let request_path = request.uri().path().to_string();
    let request_uri = request.uri().to_string();
    let response = next.run(request).await;
    let status_code = response.status();

    // Axum answers a known path with the wrong method with an empty 405
    if status_code == StatusCode::METHOD_NOT_ALLOWED {
        tracing::warn!(
            path = %request_path,
            uri = %request_uri,
            "Method not allowed"
        );
        return Ok(ApiError::method_not_allowed().into_response());
    }

    // Transform server errors to internal server error for user – except for 503 from the root route
    if status_code.is_server_error() && status_code != StatusCode::SERVICE_UNAVAILABLE {
        handle_server_error(response, &request_path, &request_uri, status_code).await
    } else if status_code.is_client_error() {
        log_client_error(response, &request_path, &request_uri, status_code).await
    } else {
        Ok(response)
    }
}

async fn handle_server_error(
    response: Response,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) -> Result<Response, Infallible> {
    let body = response.into_body();

    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => parse_and_log_error(bytes, request_path, request_uri, status_code),
        Err(e) => {
            log_and_capture_error(
                "Failed to read body",
                e,
                request_path,
                request_uri,
                status_code,
            );
        },
    }

    Ok(ApiError::internal_server_error_user().into_response())
}

async fn log_client_error(
    response: Response,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) -> Result<Response, Infallible> {
    let (parts, body) = response.into_parts();

    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            match serde_json::from_slice::<ApiError>(&bytes) {
                Ok(api_error) if api_error.details.is_some() => tracing::warn!(
                    path = %request_path,
                    uri = %request_uri,
                    status = %status_code,
                    "Caught validation error: {:?}",
                    api_error.details,
                ),
                Ok(api_error) => tracing::warn!(
                    path = %request_path,
                    uri = %request_uri,
                    status = %status_code,
                    "Client error: {} - {}",
                    api_error.error,
                    api_error.message,
                ),
                Err(_) => tracing::warn!(
                    path = %request_path,
                    uri = %request_uri,
                    status = %status_code,
                    "Client error: {}",
                    String::from_utf8_lossy(&bytes),
                ),
            }

            // Reconstruct the response with the original body
            Ok(Response::from_parts(parts, axum::body::Body::from(bytes)))
        },
        Err(_) => {
            // Body read failed; return a generic error
            Ok(ApiError::internal_server_error_user().into_response())
        },
    }
}

fn parse_and_log_error(
    bytes: Bytes,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) {
    match serde_json::from_slice::<ApiError>(&bytes) {
        Ok(error_info) => {
            tracing::error!(
                path = %request_path,
                uri = %request_uri,
                status = %status_code,
                "Server error: {} - {}",
                error_info.error,
                error_info.message,
            );
            log_to_sentry("|", format!("{error_info:?}"), request_path, status_code)
        },
        Err(e) => {
            let body_str = String::from_utf8_lossy(&bytes);
            tracing::error!(
                path = %request_path,
                uri = %request_uri,
                status = %status_code,
                body = %body_str,
                "Server error: failed to parse body as JSON: {e:?}",
            );
            log_to_sentry(
                "JSON Parse Error",
                format!("{e:?}"),
                request_path,
                status_code,
            );
        },
    }
}

fn log_and_capture_error(
    message: &str,
    error: impl std::fmt::Debug,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) {
    tracing::error!(
        path = %request_path,
        uri = %request_uri,
        status = %status_code,
        "{}: {:?}",
        message,
        error,
    );

    let exception = Exception {
        ty: "ServerError".to_string(),
        value: Some(format!("{error:?}")),
        ..Default::default()
    };

    let event = Event {
        message: Some(format!(
            "{message}: URI: {request_uri}, Status: {status_code}"
        )),
        level: Level::Error,
        exception: vec![exception].into(),
        ..Default::default()
    };

    sentry::capture_event(event);
}

fn log_to_sentry(context: &str, detail: String, request_path: &str, status_code: StatusCode) {
    let breadcrumb = Breadcrumb {
        message: Some(format!("Request at {request_path}")),
        category: Some("request".into()),
        level: Level::Info,
        ..Default::default()
    };

    sentry::add_breadcrumb(breadcrumb);

    let event = Event {
        message: Some(format!("{status_code} - {context}: {detail}")),
        level: Level::Error,
        ..Default::default()
    };

    sentry::capture_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::middleware;
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use rstest::{fixture, rstest};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    #[derive(Clone)]
    struct HandlerParams {
        status_code: StatusCode,
        body: Option<String>,
    }

    async fn test_handler(Extension(params): Extension<Arc<HandlerParams>>) -> impl IntoResponse {
        let body = params.body.clone().unwrap_or_default();
        Response::builder()
            .status(params.status_code)
            .body(Body::from(body))
            .unwrap()
    }

    async fn panicking_handler() -> &'static str {
        panic!("connection string postgres://secret@db leaked")
    }

    #[fixture]
    fn request_path() -> &'static str {
        "/test"
    }

    #[fixture]
    fn app() -> Router {
        Router::new()
    }

    #[rstest]
    // Database failure -> generic internal server error
    #[case(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(r#"{"error":"Internal Server Error","message":"Database query error: relation does not exist","status_code":500}"#),
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(ApiError::internal_server_error_user().message)
    )]
    // Unparsable 502 -> generic internal server error
    #[case(
        StatusCode::BAD_GATEWAY,
        Some("upstream exploded"),
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(ApiError::internal_server_error_user().message)
    )]
    // Method not allowed -> JSON 405
    #[case(
        StatusCode::METHOD_NOT_ALLOWED,
        None,
        StatusCode::METHOD_NOT_ALLOWED,
        Some(ApiError::method_not_allowed().message)
    )]
    // Bad request -> passes through with body preserved
    #[case(
        StatusCode::BAD_REQUEST,
        Some(r#"{"error":"Bad Request","message":"addresses is required in query","status_code":400}"#),
        StatusCode::BAD_REQUEST,
        Some("addresses is required in query".to_string())
    )]
    // Validation failure -> passes through with details preserved
    #[case(
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(r#"{"error":"Unprocessable Entity","message":"Validation Failed","status_code":422,"details":{"addresses[0]":{"message":"invalid hex string","value":"zz"}}}"#),
        StatusCode::UNPROCESSABLE_ENTITY,
        Some("Validation Failed".to_string())
    )]
    // Not found -> passes through with body preserved
    #[case(
        StatusCode::NOT_FOUND,
        Some(r#"{"error":"Not Found","message":"nic","status_code":404}"#),
        StatusCode::NOT_FOUND,
        Some("nic".to_string())
    )]
    // Service unavailable -> untouched
    #[case(StatusCode::SERVICE_UNAVAILABLE, Some("down"), StatusCode::SERVICE_UNAVAILABLE, None)]
    // Success
    #[case(StatusCode::OK, Some("Success"), StatusCode::OK, None)]
    #[tokio::test]
    async fn test_error_middleware(
        #[case] handler_status: StatusCode,
        #[case] handler_body: Option<&'static str>,
        #[case] expected_status: StatusCode,
        #[case] expected_error_message: Option<String>,
        app: Router,
        request_path: &str,
    ) {
        // Prepare
        let handler_params = Arc::new(HandlerParams {
            status_code: handler_status,
            body: handler_body.map(|s| s.to_string()),
        });

        // Build
        let app = app
            .route(
                request_path,
                get(test_handler).layer(Extension(handler_params)),
            )
            .layer(middleware::from_fn(error_middleware));

        // Send a request
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri(request_path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), expected_status);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        if let Some(expected_message) = expected_error_message {
            let error: ApiError = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(error.message, expected_message);
        } else {
            let body_str = String::from_utf8(body_bytes.to_vec()).unwrap();
            assert_eq!(body_str, handler_body.unwrap_or_default());
        }
    }

    async fn failing_handler() -> ApiError {
        ApiError::internal_server_error("pool timed out after 30s".to_string())
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_server_error_logged_once() {
        let app = Router::new()
            .route("/fail", get(failing_handler))
            .layer(middleware::from_fn(error_middleware));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/fail")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        logs_assert(|lines: &[&str]| {
            let errors: Vec<&&str> = lines.iter().filter(|l| l.contains("ERROR")).collect();

            match errors.as_slice() {
                [line] if line.contains("pool timed out after 30s") => Ok(()),
                _ => Err(format!("expected a single error line, got {errors:?}")),
            }
        });
    }

    #[tokio::test]
    async fn test_panic_is_hidden() {
        let app = Router::new()
            .route("/panic", get(panicking_handler))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn(error_middleware));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/panic")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8_lossy(&body_bytes);

        assert!(!body.contains("secret"));
        let error: ApiError = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(error, ApiError::internal_server_error_user());
    }
}
