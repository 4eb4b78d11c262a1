use crate::config::LocaleConfig;
use crate::error::LocaleResult;
use crate::locale::{Locale, LocaleAttr};
use crate::routing::action::Attributes;
use crate::routing::group::GroupContext;
use crate::routing::route::Route;
use std::sync::Arc;

/// Finds the locale a route or group explicitly asks for.
#[derive(Debug, Clone)]
pub struct ActionLocaleResolver {
    config: Arc<LocaleConfig>,
}

impl ActionLocaleResolver {
    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    /// The raw `locale` attribute, if any.
    pub fn action_locales<'a>(&self, attributes: &'a Attributes) -> Option<&'a LocaleAttr> {
        attributes.locale.as_ref()
    }

    /// The locale that applies to `attributes`.
    ///
    /// A list resolves to its last element. The code must be active.
    pub fn action_locale(&self, attributes: &Attributes) -> LocaleResult<Option<Locale>> {
        self.resolve(self.action_locales(attributes))
    }

    /// The locale of a registered route.
    pub fn route_locale<H>(&self, route: &Route<H>) -> LocaleResult<Option<Locale>> {
        self.resolve(route.locale())
    }

    /// The locale of a route declared inside `context`. The route's own
    /// `locale` attribute takes precedence over the group's.
    pub fn effective_locale(
        &self,
        context: &GroupContext,
        attributes: &Attributes,
    ) -> LocaleResult<Option<Locale>> {
        match self.action_locale(attributes)? {
            Some(locale) => Ok(Some(locale)),
            None => self.resolve(context.locale()),
        }
    }

    fn resolve(&self, attr: Option<&LocaleAttr>) -> LocaleResult<Option<Locale>> {
        match attr.and_then(LocaleAttr::last) {
            Some(code) => Ok(Some(self.config.ensure_active(code)?.clone())),
            None => Ok(None),
        }
    }
}
