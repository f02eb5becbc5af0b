//! Token endpoint response parsing
//!
//! Vend answers the code exchange with a JSON object. A body carrying an
//! `error` field is a failure regardless of the HTTP status; anything else
//! must contain `access_token` and is handed to the caller as a
//! [`TokenResponse`]. Fields Vend adds later land in `extra`, as do known
//! fields whose value has an unexpected type. An `error` of `null` counts as
//! absent.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Successful response from the token endpoint.
///
/// `expires` is an absolute unix timestamp in seconds; `expires_in` is a
/// delta in seconds from the response time.
#[derive(Clone, PartialEq, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Store subdomain the token was issued for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_prefix: Option<String>,
    /// Every other field the provider included
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires", &self.expires)
            .field("expires_in", &self.expires_in)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("domain_prefix", &self.domain_prefix)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Turn a provider `error` value into its message.
///
/// Strings are taken verbatim; any other JSON value is rendered as JSON.
fn error_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Non-null `error` value of a parsed body.
fn error_field(value: &Value) -> Option<&Value> {
    value.get("error").filter(|error| !error.is_null())
}

/// Extract the provider's `error` message from a body, if it has one.
pub(crate) fn provider_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    error_field(&value).map(error_message)
}

/// Remove `key` from `fields` when `convert` accepts its value.
///
/// `null` is dropped as absent. A value `convert` rejects stays in `fields`.
fn take<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let converted = match fields.get(key)? {
        Value::Null => None,
        value => Some(convert(value)?),
    };
    fields.remove(key);
    converted
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Integers, also when sent as numeric strings.
fn as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

fn as_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

/// Parse a token endpoint body.
///
/// A non-null `error` ⇒ [`Error::RemoteAuthentication`]; otherwise the whole
/// object is the token and must carry a string `access_token`.
pub fn parse_token_response(body: &str) -> Result<TokenResponse> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::InvalidResponse(format!("body is not JSON: {e}")))?;

    if let Some(error) = error_field(&value) {
        return Err(Error::RemoteAuthentication(error_message(error)));
    }

    let Value::Object(mut fields) = value else {
        return Err(Error::InvalidResponse("body is not a JSON object".into()));
    };
    fields.remove("error");

    let access_token = take(&mut fields, "access_token", as_string)
        .ok_or_else(|| Error::InvalidResponse("missing access_token".into()))?;

    Ok(TokenResponse {
        access_token,
        token_type: take(&mut fields, "token_type", as_string),
        expires: take(&mut fields, "expires", as_i64),
        expires_in: take(&mut fields, "expires_in", as_u64),
        refresh_token: take(&mut fields, "refresh_token", as_string),
        domain_prefix: take(&mut fields, "domain_prefix", as_string),
        extra: fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_vend_response() {
        let body = r#"{"access_token":"ACCESS_TOKEN","token_type":"Bearer","expires":1387145621,"expires_in":604800,"refresh_token":"REFRESH_TOKEN"}"#;
        let token = parse_token_response(body).unwrap();
        assert_eq!(token.access_token, "ACCESS_TOKEN");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.expires, Some(1_387_145_621));
        assert_eq!(token.expires_in, Some(604_800));
        assert_eq!(token.refresh_token.as_deref(), Some("REFRESH_TOKEN"));
        assert!(token.extra.is_empty());
    }

    #[test]
    fn access_token_alone_is_enough() {
        let token = parse_token_response(r#"{"access_token": "ACCESS_TOKEN"}"#).unwrap();
        assert_eq!(token.access_token, "ACCESS_TOKEN");
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn unknown_fields_are_kept() {
        let token =
            parse_token_response(r#"{"access_token":"a","domain_prefix":"shop","scope":"all"}"#)
                .unwrap();
        assert_eq!(token.domain_prefix.as_deref(), Some("shop"));
        assert_eq!(token.extra.get("scope"), Some(&Value::from("all")));
    }

    #[test]
    fn error_field_wins_over_access_token() {
        let err =
            parse_token_response(r#"{"error":"invalid_grant","access_token":"x"}"#).unwrap_err();
        assert!(matches!(err, Error::RemoteAuthentication(ref m) if m == "invalid_grant"));
    }

    #[test]
    fn null_error_is_not_a_failure() {
        let token =
            parse_token_response(r#"{"access_token":"ACCESS_TOKEN","error":null}"#).unwrap();
        assert_eq!(token.access_token, "ACCESS_TOKEN");
        assert!(!token.extra.contains_key("error"));
        assert_eq!(provider_error(r#"{"error":null}"#), None);
    }

    #[test]
    fn numeric_string_expiry_is_accepted() {
        let token = parse_token_response(
            r#"{"access_token":"ACCESS_TOKEN","expires":"1387145621","expires_in":" 604800"}"#,
        )
        .unwrap();
        assert_eq!(token.expires, Some(1_387_145_621));
        assert_eq!(token.expires_in, Some(604_800));
        assert!(token.extra.is_empty());
    }

    #[test]
    fn mistyped_optional_fields_move_to_extra() {
        let token = parse_token_response(
            r#"{"access_token":"ACCESS_TOKEN","token_type":7,"expires":"soon","refresh_token":null}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "ACCESS_TOKEN");
        assert_eq!(token.token_type, None);
        assert_eq!(token.expires, None);
        assert_eq!(token.refresh_token, None);
        assert_eq!(token.extra.get("token_type"), Some(&Value::from(7)));
        assert_eq!(token.extra.get("expires"), Some(&Value::from("soon")));
        assert!(!token.extra.contains_key("refresh_token"));
    }

    #[test]
    fn non_string_access_token_is_invalid() {
        let err = parse_token_response(r#"{"access_token":12345}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
        let err = parse_token_response(r#"["access_token"]"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn non_string_error_is_rendered_as_json() {
        let err = parse_token_response(r#"{"error":{"code":7}}"#).unwrap_err();
        assert!(matches!(err, Error::RemoteAuthentication(ref m) if m == r#"{"code":7}"#));
    }

    #[test]
    fn missing_access_token_is_invalid() {
        let err = parse_token_response(r#"{"token_type":"Bearer"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn non_json_body_is_invalid() {
        let err = parse_token_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn debug_redacts_tokens() {
        let token = parse_token_response(
            r#"{"access_token":"ACCESS_TOKEN","refresh_token":"REFRESH_TOKEN"}"#,
        )
        .unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("ACCESS_TOKEN"));
        assert!(!debug.contains("REFRESH_TOKEN"));
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let token = parse_token_response(r#"{"access_token":"at"}"#).unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), r#"{"access_token":"at"}"#);
    }

    #[test]
    fn provider_error_reads_status_bodies() {
        assert_eq!(
            provider_error(r#"{"error":"invalid_client"}"#).as_deref(),
            Some("invalid_client")
        );
        assert_eq!(provider_error("Service Unavailable"), None);
        assert_eq!(provider_error(r#"{"message":"x"}"#), None);
    }
}
