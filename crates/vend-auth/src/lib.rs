//! Vend OAuth authentication library
//!
//! Negotiates an access token for one Vend store using the OAuth2
//! authorization-code grant. The crate owns no transport: callers inject an
//! [`HttpClient`] for the token POST and a [`Redirector`] for sending the
//! user to Vend, so the gateway can run inside any web framework.
//!
//! Flow:
//! 1. `AuthenticationGateway::new(http_client, redirector)`
//! 2. Chain `for_store_name`, `using_client_id`, `using_client_secret`,
//!    `and_returning_to`
//! 3. `initiate_login()` returns the redirector's response
//! 4. Vend calls back with `?code=...`
//! 5. `to_exchange(code)` returns a [`TokenResponse`]

pub mod constants;
pub mod error;
pub mod gateway;
pub mod http;
pub mod redirect;
pub mod token;

pub use constants::*;
pub use error::{Error, Result};
pub use gateway::{AuthenticationGateway, Endpoints, GatewayConfig};
pub use http::{HttpClient, HttpError, HttpFuture};
pub use redirect::Redirector;
pub use token::{TokenResponse, parse_token_response};
