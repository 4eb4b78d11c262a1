//! Route middleware tokens and the session locale middleware.
//!
//! Middleware is referenced by alias tokens of the form `name` or
//! `name:parameter` (e.g. `locale.session:fr`). `MiddlewareRegistry` maps
//! aliases to axum layers when a route table is turned into a router.

use crate::error::{LocaleError, RouteError, RouteResult};
use crate::locale::{Locale, SESSION_MIDDLEWARE};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cookie the session middleware records the locale in.
pub const LOCALE_COOKIE: &str = "locale";

/// Split a middleware token into alias and parameter.
pub fn parse_middleware(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((name, parameter)) => (name, Some(parameter)),
        None => (token, None),
    }
}

/// Middleware list of a route localized for `locale`.
///
/// Session markers of other locales are dropped, duplicates removed, and a
/// single `locale.session:<locale>` is appended.
pub fn session_middleware<I, S>(middleware: I, locale: &Locale) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for entry in middleware {
        let entry = entry.as_ref();
        if parse_middleware(entry).0 == SESSION_MIDDLEWARE {
            continue;
        }
        if !result.iter().any(|existing| existing == entry) {
            result.push(entry.to_string());
        }
    }
    result.push(locale.session_middleware());
    result
}

/// Locale recorded for the current request, available as a request
/// extension to handlers behind the session middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLocale(pub Locale);

/// Record `locale` for the request and remember it in the locale cookie.
pub async fn set_session_locale(
    State(locale): State<Locale>,
    mut request: Request,
    next: Next,
) -> Response {
    debug!("Recording session locale {}", locale);
    request.extensions_mut().insert(CurrentLocale(locale.clone()));

    let mut response = next.run(request).await;

    let cookie = format!("{}={}; Path=/; SameSite=Lax", LOCALE_COOKIE, locale);
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!("Could not set locale cookie for {}: {}", locale, e),
    }

    response
}

type LayerFn = Arc<dyn Fn(MethodRouter, Option<&str>) -> RouteResult<MethodRouter> + Send + Sync>;

/// Middleware aliases usable in route middleware lists.
///
/// `Default` registers `locale.session`.
#[derive(Clone)]
pub struct MiddlewareRegistry {
    layers: HashMap<String, LayerFn>,
}

impl MiddlewareRegistry {
    /// A registry without any alias.
    pub fn empty() -> Self {
        Self {
            layers: HashMap::new(),
        }
    }

    /// Register `name`. The function receives the endpoint and the token
    /// parameter, and returns the wrapped endpoint.
    pub fn register<F>(&mut self, name: impl Into<String>, layer: F) -> &mut Self
    where
        F: Fn(MethodRouter, Option<&str>) -> RouteResult<MethodRouter> + Send + Sync + 'static,
    {
        self.layers.insert(name.into(), Arc::new(layer));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Wrap `endpoint` with the middleware referenced by `token`.
    pub fn apply(&self, endpoint: MethodRouter, token: &str) -> RouteResult<MethodRouter> {
        let (name, parameter) = parse_middleware(token);
        let layer = self
            .layers
            .get(name)
            .ok_or_else(|| RouteError::UnknownMiddleware {
                name: name.to_string(),
            })?;
        layer(endpoint, parameter)
    }
}

impl Default for MiddlewareRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(SESSION_MIDDLEWARE, |endpoint, parameter| {
            let code = parameter.ok_or_else(|| {
                LocaleError::invalid_configuration(format!(
                    "{} requires a locale parameter",
                    SESSION_MIDDLEWARE
                ))
            })?;
            let locale = Locale::new(code)?;
            Ok(endpoint.layer(from_fn_with_state(locale, set_session_locale)))
        });
        registry
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.layers.keys().collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry")
            .field("layers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fr() -> Locale {
        Locale::new("fr").unwrap()
    }

    // ==================== Token Tests ====================

    #[test]
    fn test_parse_middleware() {
        assert_eq!(parse_middleware("locale.session:fr"), ("locale.session", Some("fr")));
        assert_eq!(parse_middleware("auth"), ("auth", None));
    }

    #[test]
    fn test_session_middleware_appends_marker() {
        let middleware = session_middleware(["guest", "auth"], &fr());
        assert_eq!(middleware, vec!["guest", "auth", "locale.session:fr"]);
    }

    #[test]
    fn test_session_middleware_without_input() {
        let middleware = session_middleware(Vec::<String>::new(), &fr());
        assert_eq!(middleware, vec!["locale.session:fr"]);
    }

    #[test]
    fn test_session_middleware_replaces_other_markers() {
        let middleware = session_middleware(
            ["auth", "locale.session:en", "auth", "locale.session:fr"],
            &fr(),
        );
        assert_eq!(middleware, vec!["auth", "locale.session:fr"]);
    }

    // ==================== Registry Tests ====================

    #[test]
    fn test_default_registry_has_session_alias() {
        let registry = MiddlewareRegistry::default();
        assert!(registry.contains("locale.session"));
        assert!(!MiddlewareRegistry::empty().contains("locale.session"));
    }

    #[test]
    fn test_unknown_alias() {
        let registry = MiddlewareRegistry::default();
        let err = registry.apply(MethodRouter::new(), "auth").unwrap_err();
        assert_eq!(
            err,
            RouteError::UnknownMiddleware {
                name: "auth".to_string()
            }
        );
    }

    #[test]
    fn test_session_alias_requires_locale() {
        let registry = MiddlewareRegistry::default();
        assert!(registry.apply(MethodRouter::new(), "locale.session").is_err());
        assert!(registry.apply(MethodRouter::new(), "locale.session:f/r").is_err());
        assert!(registry.apply(MethodRouter::new(), "locale.session:fr").is_ok());
    }

    #[test]
    fn test_custom_alias() {
        let mut registry = MiddlewareRegistry::empty();
        registry.register("noop", |endpoint, _| Ok(endpoint));
        assert!(registry.apply(MethodRouter::new(), "noop").is_ok());
    }
}
