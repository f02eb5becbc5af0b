//! Redirector backed by axum responses

use axum::response::Redirect;
use vend_auth::Redirector;

/// Answers a login with `303 See Other` to the authorization URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxumRedirector;

impl Redirector for AxumRedirector {
    type Output = Redirect;

    fn redirect(&self, uri: &str) -> Redirect {
        Redirect::to(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;

    #[test]
    fn redirects_with_location_header() {
        let response = AxumRedirector
            .redirect("https://secure.vendhq.com/connect?response_type=code")
            .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://secure.vendhq.com/connect?response_type=code"
        );
    }
}
