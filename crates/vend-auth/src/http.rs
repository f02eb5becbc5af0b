//! HTTP Client capability consumed by the gateway
//!
//! Transport concerns (TLS, cookies, auth headers, timeouts) belong to the
//! implementation. The gateway only needs "GET a URL" and "POST a form to a
//! URL" and the raw response body back.
//!
//! Uses `Pin<Box<dyn Future>>` return types so the trait stays dyn-compatible
//! (`Arc<dyn HttpClient>`).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Transport-level failures surfaced by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// Connection, TLS, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Server answered with a non-2xx status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl HttpError {
    /// Response body, when the server sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            HttpError::Status { body, .. } => Some(body),
            HttpError::Request(_) => None,
        }
    }
}

/// Boxed response future returned by [`HttpClient`] methods.
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<String, HttpError>> + Send + 'a>>;

/// Issues HTTP requests and returns raw response bodies.
pub trait HttpClient: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a>;

    /// POST `form` as `application/x-www-form-urlencoded`.
    fn post<'a>(&'a self, url: &'a str, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a> {
        (**self).get(url)
    }

    fn post<'a>(&'a self, url: &'a str, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
        (**self).post(url, form)
    }
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a> {
        (**self).get(url)
    }

    fn post<'a>(&'a self, url: &'a str, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
        (**self).post(url, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl HttpClient for Fixed {
        fn get<'a>(&'a self, _url: &'a str) -> HttpFuture<'a> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }

        fn post<'a>(&'a self, _url: &'a str, _form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    #[tokio::test]
    async fn shared_and_borrowed_clients_delegate() {
        let arc: Arc<dyn HttpClient> = Arc::new(Fixed("{}"));
        assert_eq!(arc.get("https://x").await.unwrap(), "{}");

        let owned = Fixed("ok");
        let borrowed = &owned;
        assert_eq!(borrowed.post("https://x", &[]).await.unwrap(), "ok");
    }

    #[test]
    fn status_error_exposes_body() {
        let err = HttpError::Status {
            status: 400,
            body: r#"{"error":"invalid_grant"}"#.into(),
        };
        assert_eq!(err.body(), Some(r#"{"error":"invalid_grant"}"#));
        assert_eq!(HttpError::Request("timeout".into()).body(), None);
    }
}
