//! Configuration loading errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_field() {
        let err = Error::Config("vend.client_id must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: vend.client_id must not be empty"
        );
    }

    #[test]
    fn io_and_toml_errors_convert() {
        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(io.to_string().starts_with("I/O error:"), "got: {io}");

        let toml_err = toml::from_str::<toml::Table>("not valid {{{{ toml").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Toml(_)));
    }
}
