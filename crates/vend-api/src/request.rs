//! HTTP transport for Vend
//!
//! Wraps a single `reqwest::Client` per store session. The client keeps a
//! cookie store so the session cookie Vend sets on the first response is
//! replayed on later calls, and every request carries the configured
//! credentials plus `Accept: application/json`.
//!
//! Paths starting with `/` are resolved against the store's base URL.
//! Absolute `http(s)://` URLs pass through untouched, which is what the
//! token exchange needs since the token endpoint is computed by the gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::Secret;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;
use vend_auth::{HttpClient, HttpError, HttpFuture};

use crate::error::{Error, Result};

/// Request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("vend-connect/", env!("CARGO_PKG_VERSION"));

/// How requests authenticate against the store.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No Authorization header (token exchange authenticates in the body)
    None,
    /// Username/password Basic auth
    Basic {
        username: String,
        password: Secret<String>,
    },
    /// OAuth access token obtained from the authentication gateway
    Bearer(Secret<String>),
}

/// Builder for [`VendRequest`].
#[derive(Debug)]
pub struct VendRequestBuilder {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    user_agent: String,
    verify_peer: bool,
    root_certificate: Option<PathBuf>,
}

impl VendRequestBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::Basic {
            username: username.into(),
            password: Secret::new(password.into()),
        })
    }

    pub fn bearer_auth(self, access_token: impl Into<String>) -> Self {
        self.credentials(Credentials::Bearer(Secret::new(access_token.into())))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Disable TLS certificate verification. Only for test stores.
    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.verify_peer = verify;
        self
    }

    /// Trust an extra PEM root certificate in addition to the built-in roots.
    pub fn root_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_certificate = Some(path.into());
        self
    }

    pub fn build(self) -> Result<VendRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(headers)
            .danger_accept_invalid_certs(!self.verify_peer);

        if let Some(path) = &self.root_certificate {
            let pem = std::fs::read(path).map_err(|e| {
                Error::Client(format!(
                    "reading root certificate {}: {e}",
                    path.display()
                ))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| Error::Client(format!("parsing root certificate: {e}")))?;
            builder = builder.add_root_certificate(certificate);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(VendRequest {
            client,
            base_url: self.base_url,
            credentials: Arc::new(self.credentials),
        })
    }
}

/// Authenticated HTTP session against one Vend store.
///
/// Cloning is cheap and clones share the connection pool and cookie store.
#[derive(Debug, Clone)]
pub struct VendRequest {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<Credentials>,
}

impl VendRequest {
    /// Start building a session for `base_url` (e.g. `https://shop.vendhq.com`).
    ///
    /// A trailing `/` is trimmed.
    pub fn builder(base_url: impl Into<String>) -> VendRequestBuilder {
        VendRequestBuilder {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: Credentials::None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verify_peer: true,
            root_certificate: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a store-relative path, or pass an absolute URL through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub async fn get(&self, path: &str) -> std::result::Result<String, HttpError> {
        let url = self.url_for(path);
        self.execute("GET", &url, self.client.get(&url)).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> std::result::Result<String, HttpError> {
        let url = self.url_for(path);
        self.execute("POST", &url, self.client.post(&url).form(form))
            .await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> std::result::Result<String, HttpError> {
        let url = self.url_for(path);
        self.execute("POST", &url, self.client.post(&url).json(body))
            .await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> std::result::Result<String, HttpError> {
        let url = self.url_for(path);
        self.execute("PUT", &url, self.client.put(&url).json(body))
            .await
    }

    /// True when `url` points at this store, i.e. lies under the base URL.
    fn is_store_url(&self, url: &str) -> bool {
        url.strip_prefix(self.base_url.as_str()).is_some_and(|rest| {
            rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')
        })
    }

    /// Attach store credentials. Requests to other hosts go out anonymous.
    fn authorize(&self, url: &str, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if !self.is_store_url(url) {
            return request;
        }
        match self.credentials.as_ref() {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password.expose()))
            }
            Credentials::Bearer(token) => request.bearer_auth(token.expose()),
        }
    }

    /// Send the request and return the body of a 2xx response.
    async fn execute(
        &self,
        method: &str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<String, HttpError> {
        let response = self
            .authorize(url, request)
            .send()
            .await
            .map_err(|e| HttpError::Request(format!("{method} {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Request(format!("reading {method} {url} response: {e}")))?;

        debug!(method, url, status = status.as_u16(), "Vend request completed");

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl HttpClient for VendRequest {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a> {
        Box::pin(VendRequest::get(self, url))
    }

    fn post<'a>(&'a self, url: &'a str, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
        Box::pin(self.post_form(url, form))
    }
}
