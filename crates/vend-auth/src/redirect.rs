//! Redirector capability
//!
//! The gateway never performs redirects itself. It hands the authentication
//! URI to a `Redirector` and returns whatever the hosting framework produced
//! (a response value, a continuation, a plain string in tests).

/// Performs an HTTP redirect to `uri`.
pub trait Redirector {
    /// What the hosting environment returns for a redirect.
    type Output;

    fn redirect(&self, uri: &str) -> Self::Output;
}
