//! Error types for locale resolution and route registration.

use thiserror::Error;

/// Errors raised while validating locales or localization settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The locale code is not part of the active locale set
    #[error("Invalid locale: '{locale}' is not an active locale")]
    InvalidLocale { locale: String },

    /// Configuration or attribute input that cannot be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl LocaleError {
    pub(crate) fn invalid_locale(locale: impl Into<String>) -> Self {
        Self::InvalidLocale {
            locale: locale.into(),
        }
    }

    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Errors raised by route registration and URL generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Locale(#[from] LocaleError),

    /// No route is registered under this name
    #[error("Route [{name}] not defined")]
    RouteNotFound { name: String },

    /// A required URI parameter was not supplied
    #[error("Missing required parameter '{parameter}' for route [{name}]")]
    MissingParameter { name: String, parameter: String },

    /// Two routes would share the same name
    #[error("Route name [{name}] is already registered")]
    DuplicateName { name: String },

    /// Two routes would answer the same method and URI
    #[error("Route {method} /{uri} is already registered")]
    DuplicateRoute { method: String, uri: String },

    /// A route references a middleware alias nobody registered
    #[error("Middleware [{name}] is not registered")]
    UnknownMiddleware { name: String },
}

/// Result type for locale operations
pub type LocaleResult<T> = Result<T, LocaleError>;

/// Result type for routing operations
pub type RouteResult<T> = Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_locale_message() {
        let err = LocaleError::invalid_locale("de");
        assert_eq!(err.to_string(), "Invalid locale: 'de' is not an active locale");
    }

    #[test]
    fn test_locale_error_converts_transparently() {
        let err: RouteError = LocaleError::invalid_configuration("empty locale list").into();
        assert_eq!(err.to_string(), "Invalid configuration: empty locale list");
        assert!(matches!(err, RouteError::Locale(_)));
    }

    #[test]
    fn test_route_not_found_message() {
        let err = RouteError::RouteNotFound {
            name: "fr.route".to_string(),
        };
        assert_eq!(err.to_string(), "Route [fr.route] not defined");
    }
}
