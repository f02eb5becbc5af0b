//! Vend OAuth authorization-code flow
//!
//! One gateway negotiates credentials for one store:
//! 1. Configure store, client id, client secret and callback URI
//! 2. `initiate_login()` hands the authorization URI to the redirector
//! 3. Vend calls back with a temporary code
//! 4. `to_exchange(code)` POSTs the code to the store's token endpoint
//!
//! Preconditions are checked before either collaborator is touched, so a
//! misconfigured gateway never redirects and never hits the network. The
//! gateway emits no log events; outcomes are reported to the caller only.

use common::Secret;
use url::form_urlencoded;

use crate::constants::{
    ACCESS_ENDPOINT_TEMPLATE, AUTHORIZATION_ENDPOINT, GRANT_TYPE_AUTHORIZATION_CODE,
    RESPONSE_TYPE_CODE, STORE_PLACEHOLDER,
};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpError};
use crate::redirect::Redirector;
use crate::token::{TokenResponse, parse_token_response, provider_error};

/// OAuth endpoints the gateway talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Where users are sent to approve the application
    pub authorization: String,
    /// Token endpoint with a `{store}` placeholder for the store subdomain
    pub access_template: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorization: AUTHORIZATION_ENDPOINT.to_string(),
            access_template: ACCESS_ENDPOINT_TEMPLATE.to_string(),
        }
    }
}

/// Store identity and client credentials for one flow.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub store_name: String,
    pub client_id: String,
    pub client_secret: Option<Secret<String>>,
    pub redirect_uri: Option<String>,
    pub endpoints: Endpoints,
}

impl GatewayConfig {
    fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref().filter(|uri| !uri.is_empty())
    }

    fn can_build_authentication_uri(&self) -> bool {
        !self.client_id.is_empty() && !self.store_name.is_empty()
    }

    fn can_authenticate_user(&self) -> bool {
        !self.client_id.is_empty()
            && self
                .client_secret
                .as_ref()
                .is_some_and(|secret| !secret.is_blank())
    }
}

/// Negotiates an access token for a single Vend store.
pub struct AuthenticationGateway<H, R> {
    http_client: H,
    redirector: R,
    config: GatewayConfig,
}

impl<H, R> AuthenticationGateway<H, R>
where
    H: HttpClient,
    R: Redirector,
{
    pub fn new(http_client: H, redirector: R) -> Self {
        Self::with_config(http_client, redirector, GatewayConfig::default())
    }

    /// Build a gateway from a complete configuration record.
    pub fn with_config(http_client: H, redirector: R, config: GatewayConfig) -> Self {
        Self {
            http_client,
            redirector,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn for_store_name(&mut self, store_name: impl Into<String>) -> &mut Self {
        self.config.store_name = store_name.into();
        self
    }

    pub fn using_client_id(&mut self, client_id: impl Into<String>) -> &mut Self {
        self.config.client_id = client_id.into();
        self
    }

    pub fn using_client_secret(&mut self, client_secret: impl Into<String>) -> &mut Self {
        self.config.client_secret = Some(Secret::new(client_secret.into()));
        self
    }

    pub fn and_returning_to(&mut self, redirect_uri: impl Into<String>) -> &mut Self {
        self.config.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_endpoints(&mut self, endpoints: Endpoints) -> &mut Self {
        self.config.endpoints = endpoints;
        self
    }

    /// URI users are sent to for approving the application.
    ///
    /// Query parameters are form-encoded in a fixed order: `response_type`,
    /// `client_id`, then `redirect_uri` when one is configured. Does not
    /// validate the configuration.
    pub fn authentication_uri(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("response_type", RESPONSE_TYPE_CODE)
            .append_pair("client_id", &self.config.client_id);
        if let Some(redirect_uri) = self.config.redirect_uri() {
            query.append_pair("redirect_uri", redirect_uri);
        }
        format!("{}?{}", self.config.endpoints.authorization, query.finish())
    }

    /// Token endpoint for the configured store.
    pub fn access_uri(&self) -> String {
        self.config
            .endpoints
            .access_template
            .replace(STORE_PLACEHOLDER, &self.config.store_name)
    }

    /// Redirect the user to Vend's authorization page.
    ///
    /// Returns the redirector's output unchanged.
    pub fn initiate_login(&self) -> Result<R::Output> {
        if !self.config.can_build_authentication_uri() {
            return Err(Error::Configuration(
                "cannot build authentication URI, dependencies are missing".into(),
            ));
        }

        let uri = self.authentication_uri();
        Ok(self.redirector.redirect(&uri))
    }

    /// Exchange a temporary authorization code for an access token.
    ///
    /// Performs exactly one POST to [`Self::access_uri`]. A response body
    /// carrying `error` fails with [`Error::RemoteAuthentication`], also when
    /// the endpoint answered with a non-2xx status.
    pub async fn to_exchange(&self, code: &str) -> Result<TokenResponse> {
        if !self.config.can_authenticate_user() {
            return Err(Error::Configuration(
                "cannot authenticate user, dependencies are missing".into(),
            ));
        }

        if code.trim().is_empty() {
            return Err(Error::Validation("Vend code is invalid".into()));
        }

        let client_secret = self
            .config
            .client_secret
            .as_ref()
            .map(|secret| secret.expose().as_str())
            .unwrap_or_default();

        let mut form = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", client_secret),
            ("code", code),
            ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE),
        ];
        if let Some(redirect_uri) = self.config.redirect_uri() {
            form.push(("redirect_uri", redirect_uri));
        }

        let access_uri = self.access_uri();
        let body = self
            .http_client
            .post(&access_uri, &form)
            .await
            .map_err(remote_or_transport)?;

        parse_token_response(&body)
    }
}

/// A failed response whose body names a provider `error` is a rejection,
/// anything else is a transport failure.
fn remote_or_transport(error: HttpError) -> Error {
    let message = error.body().and_then(provider_error);
    match message {
        Some(message) => Error::RemoteAuthentication(message),
        None => Error::Transport(error),
    }
}
