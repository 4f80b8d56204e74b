//! Error types for locale resolution and route assembly.

use thiserror::Error;

/// Errors raised while validating or resolving a locale identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// The identifier is not structurally a `language[-REGION]` tag.
    #[error("malformed locale identifier '{0}'")]
    Malformed(String),

    /// The identifier does not resolve against the locale catalog, even with fallback.
    #[error("the locale {0} is not available in the locale catalog")]
    Unsupported(String),

    /// The identifier resolved but the platform refused to activate it.
    #[error("the locale {0} is not available in the system")]
    SystemUnavailable(String),
}

/// Errors raised while assembling a URL from a route name.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("missing \"name\" option")]
    MissingName,

    #[error("route with name \"{0}\" not found")]
    NotFound(String),

    #[error("route with name \"{0}\" does not have child routes")]
    NoChildRoutes(String),

    #[error("missing parameter \"{0}\"")]
    MissingParameter(String),

    #[error("request URI has not been set")]
    RequestUriMissing,

    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error("invalid URI: {0}")]
    Uri(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_error_messages() {
        assert_eq!(
            LocaleError::Malformed("x".to_string()).to_string(),
            "malformed locale identifier 'x'"
        );
        assert!(LocaleError::Unsupported("qq".to_string())
            .to_string()
            .contains("locale catalog"));
        assert!(LocaleError::SystemUnavailable("es".to_string())
            .to_string()
            .contains("system"));
    }

    #[test]
    fn test_route_error_wraps_locale_error() {
        let err: RouteError = LocaleError::Malformed("1".to_string()).into();
        assert!(matches!(err, RouteError::Locale(LocaleError::Malformed(_))));
        assert_eq!(err.to_string(), "malformed locale identifier '1'");
    }
}
