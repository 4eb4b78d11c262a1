use crate::config::LocaleConfig;
use crate::error::LocaleResult;
use crate::locale::Locale;
use crate::routing::resolver::ActionLocaleResolver;
use crate::routing::route::Route;
use crate::transform::LocaleTransformer;
use std::sync::Arc;
use tracing::debug;

/// Localizes routes that were registered with a `locale` attribute.
#[derive(Debug, Clone)]
pub struct RouteDecorator {
    transformer: LocaleTransformer,
    resolver: ActionLocaleResolver,
}

impl RouteDecorator {
    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self {
            transformer: LocaleTransformer::new(Arc::clone(&config)),
            resolver: ActionLocaleResolver::new(config),
        }
    }

    /// Rewrite the name and URI of `route` for its `locale` attribute.
    ///
    /// Routes without a locale are returned untouched. Only the name and
    /// URI change; every other attribute is kept.
    pub fn add_locale<'r, H>(&self, route: &'r mut Route<H>) -> LocaleResult<&'r mut Route<H>> {
        let Some(locale) = self.resolver.route_locale(route)? else {
            return Ok(route);
        };

        self.switch_route_locale(&locale, route)?;
        self.switch_url_locale(&locale, route)?;

        debug!(
            "Localized route {} as {:?} for {}",
            route.uri(),
            route.name(),
            locale
        );

        Ok(route)
    }

    /// Switch the route name to `locale`. Unnamed routes stay unnamed.
    pub fn switch_route_locale<'r, H>(
        &self,
        locale: &Locale,
        route: &'r mut Route<H>,
    ) -> LocaleResult<&'r mut Route<H>> {
        let Some(name) = route.name() else {
            return Ok(route);
        };

        let name = self.transformer.switch_route_locale(locale.as_str(), name)?;
        Ok(route.set_name(name))
    }

    pub fn switch_url_locale<'r, H>(
        &self,
        locale: &Locale,
        route: &'r mut Route<H>,
    ) -> LocaleResult<&'r mut Route<H>> {
        let uri = self.transformer.switch_url_locale(locale.as_str(), route.uri())?;
        Ok(route.set_uri(&uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::action::{Action, Verb};

    fn decorator() -> RouteDecorator {
        let config = LocaleConfig::from_codes(&["fr", "en"], true).unwrap();
        RouteDecorator::new(Arc::new(config))
    }

    fn route(action: Action<&'static str>) -> Route<&'static str> {
        Route::new(&[Verb::Get], "test", action)
    }

    #[test]
    fn test_route_without_locale_passes_through() {
        let mut route = route(Action::new("handler").named("route"));
        let before = route.clone();

        decorator().add_locale(&mut route).unwrap();
        assert_eq!(route, before);
    }

    #[test]
    fn test_route_with_locale_is_rewritten() {
        let mut route = route(
            Action::new("handler")
                .named("route")
                .locale("fr")
                .middleware(["auth"]),
        );

        decorator().add_locale(&mut route).unwrap();

        assert_eq!(route.name(), Some("fr.route"));
        assert_eq!(route.uri(), "fr/test");
        assert_eq!(route.gather_middleware(), ["auth"]);
        assert_eq!(route.verbs(), &[Verb::Get]);
    }

    #[test]
    fn test_unnamed_route_only_gets_uri() {
        let mut route = route(Action::new("handler").locale("en"));

        decorator().add_locale(&mut route).unwrap();

        assert_eq!(route.name(), None);
        assert_eq!(route.uri(), "en/test");
    }

    #[test]
    fn test_add_locale_is_idempotent() {
        let decorator = decorator();
        let mut route = route(Action::new("handler").named("route").locale("fr"));

        decorator.add_locale(&mut route).unwrap();
        decorator.add_locale(&mut route).unwrap();

        assert_eq!(route.name(), Some("fr.route"));
        assert_eq!(route.uri(), "fr/test");
    }

    #[test]
    fn test_invalid_locale_is_reported() {
        let mut route = route(Action::new("handler").named("route").locale("de"));
        assert!(decorator().add_locale(&mut route).is_err());
    }
}
