//! Mapping gateway errors to HTTP responses
//!
//! Each gateway error kind gets its own status so callers can tell a bad
//! callback (4xx) from a Vend outage (502) without parsing messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use vend_auth::Error;

/// HTTP status for a gateway error.
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::RemoteAuthentication(_) => StatusCode::UNAUTHORIZED,
        Error::Transport(_) | Error::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Metrics label for a gateway error.
pub fn outcome_for(err: &Error) -> &'static str {
    match err {
        Error::Configuration(_) => "configuration_error",
        Error::Validation(_) => "validation_error",
        Error::RemoteAuthentication(_) => "rejected",
        Error::Transport(_) => "transport_error",
        Error::InvalidResponse(_) => "invalid_response",
    }
}

/// JSON error body `{"error": ..., "request_id": ...}`.
pub fn json_error(status: StatusCode, message: &str, request_id: &str) -> Response {
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        serde_json::json!({ "error": message, "request_id": request_id }).to_string(),
    )
        .into_response()
}

/// Response for a gateway error.
///
/// Transport details stay in the logs; the client only sees the kind.
pub fn gateway_error_response(err: &Error, request_id: &str) -> Response {
    let message = match err {
        Error::Transport(_) => "Vend token endpoint unreachable".to_string(),
        other => other.to_string(),
    };
    json_error(status_for(err), &message, request_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vend_auth::HttpError;

    #[test]
    fn statuses_distinguish_error_kinds() {
        assert_eq!(
            status_for(&Error::Configuration("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&Error::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Error::RemoteAuthentication("invalid_grant".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&Error::Transport(HttpError::Request("x".into()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::InvalidResponse("x".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(
            outcome_for(&Error::RemoteAuthentication("x".into())),
            "rejected"
        );
        assert_eq!(
            outcome_for(&Error::Transport(HttpError::Request("x".into()))),
            "transport_error"
        );
    }

    #[tokio::test]
    async fn transport_details_are_not_leaked() {
        let err = Error::Transport(HttpError::Status {
            status: 500,
            body: "stack trace with internals".into(),
        });
        let response = gateway_error_response(&err, "req_1");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Vend token endpoint unreachable");
        assert_eq!(body["request_id"], "req_1");
    }
}
