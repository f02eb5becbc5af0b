//! Vend OAuth endpoints
//!
//! The authorization endpoint is shared by every store; the token endpoint
//! lives on the merchant's own subdomain, so it is a template with a
//! `{store}` placeholder.

/// Authorization endpoint users are redirected to
pub const AUTHORIZATION_ENDPOINT: &str = "https://secure.vendhq.com/connect";

/// Per-store token endpoint for code exchange
pub const ACCESS_ENDPOINT_TEMPLATE: &str = "https://{store}.vendhq.com/api/1.0/token";

/// Placeholder replaced by the store name in [`ACCESS_ENDPOINT_TEMPLATE`]
pub const STORE_PLACEHOLDER: &str = "{store}";

/// Only grant type this gateway speaks
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

/// Response type requested from the authorization endpoint
pub const RESPONSE_TYPE_CODE: &str = "code";
