//! The localizing router facade.
//!
//! `LocaleRouter` wraps a `Registrar` and turns every route declaration into
//! one registration per locale: `get("test", Action::new(h).named("route"))`
//! with locales `fr` and `en` registers `fr.route` at `fr/test` and
//! `en.route` at `en/test`, each carrying its `locale.session:<locale>`
//! middleware.
//!
//! Routes that declare a locale, or sit in a group that does, are registered
//! once for that locale only.

use crate::config::LocaleConfig;
use crate::error::{LocaleError, LocaleResult, RouteResult};
use crate::locale::{Locale, LocaleAttr};
use crate::middleware::session_middleware;
use crate::routing::action::{string_list, Action, Attributes, Verb};
use crate::routing::group::GroupContext;
use crate::routing::registrar::{Registrar, Resource, ResourceOptions};
use crate::routing::resolver::ActionLocaleResolver;
use crate::transform::LocaleTransformer;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Per-locale URIs for a route, plus middleware shared by all locales.
///
/// A URI given here is not localized, but it is still joined under the
/// prefix of the enclosing group. Locales without an entry fall back to
/// the localized route pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleUrls {
    urls: BTreeMap<String, String>,
    middleware: Vec<String>,
}

impl LocaleUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `uri`, without locale prefixing, for `locale`.
    pub fn url(mut self, locale: &str, uri: impl Into<String>) -> Self {
        self.urls.insert(locale.to_string(), uri.into());
        self
    }

    pub fn middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(middleware.into_iter().map(Into::into));
        self
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.urls.get(locale).map(String::as_str)
    }

    pub fn shared_middleware(&self) -> &[String] {
        &self.middleware
    }

    /// Parse `{"fr": "accueil", "en": "home", "middleware": "guest"}`.
    pub fn from_value(value: Value) -> LocaleResult<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(LocaleError::invalid_configuration(format!(
                    "locale urls must be an object, found {}",
                    other
                )))
            }
        };

        let mut urls = Self::new();
        for (key, value) in object {
            if key == "middleware" {
                urls.middleware = string_list(&key, value)?;
                continue;
            }
            match value {
                Value::String(uri) => {
                    urls.urls.insert(key, uri);
                }
                other => {
                    return Err(LocaleError::invalid_configuration(format!(
                        "url for locale '{}' must be a string, found {}",
                        key, other
                    )))
                }
            }
        }

        Ok(urls)
    }
}

/// Router facade registering every route once per locale.
pub struct LocaleRouter<'r, R: Registrar> {
    registrar: &'r mut R,
    transformer: LocaleTransformer,
    resolver: ActionLocaleResolver,
    context: GroupContext,
    urls: Option<LocaleUrls>,
}

impl<'r, R: Registrar> LocaleRouter<'r, R> {
    pub fn new(registrar: &'r mut R, config: Arc<LocaleConfig>) -> Self {
        Self {
            registrar,
            transformer: LocaleTransformer::new(Arc::clone(&config)),
            resolver: ActionLocaleResolver::new(config),
            context: GroupContext::root(),
            urls: None,
        }
    }

    pub fn config(&self) -> &LocaleConfig {
        self.transformer.config()
    }

    /// Group attributes in effect for routes declared through this router.
    pub fn context(&self) -> &GroupContext {
        &self.context
    }

    /// The wrapped host router.
    pub fn registrar(&self) -> &R {
        &*self.registrar
    }

    pub fn registrar_mut(&mut self) -> &mut R {
        &mut *self.registrar
    }

    /// A router whose next registrations use `urls` as per-locale URIs.
    ///
    /// ```rust,ignore
    /// router
    ///     .with_urls(LocaleUrls::new().url("fr", "a-propos").url("en", "about"))
    ///     .get("about", Action::new(about).named("about"))?;
    /// ```
    pub fn with_urls(&mut self, urls: LocaleUrls) -> LocaleRouter<'_, R> {
        let context = self.context.clone();
        self.scoped(context, Some(urls))
    }

    pub fn get(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&[Verb::Get], uri, action)
    }

    pub fn post(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&[Verb::Post], uri, action)
    }

    pub fn put(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&[Verb::Put], uri, action)
    }

    pub fn patch(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&[Verb::Patch], uri, action)
    }

    pub fn delete(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&[Verb::Delete], uri, action)
    }

    pub fn options(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&[Verb::Options], uri, action)
    }

    pub fn any(&mut self, uri: &str, action: Action<R::Handler>) -> RouteResult<()> {
        self.match_verbs(&Verb::ALL, uri, action)
    }

    /// Register a route answering `verbs`, once per target locale.
    pub fn match_verbs(
        &mut self,
        verbs: &[Verb],
        uri: &str,
        action: Action<R::Handler>,
    ) -> RouteResult<()> {
        for locale in self.target_locales(&action.attributes)? {
            let name = match action.name() {
                Some(name) => Some(
                    self.transformer
                        .switch_route_locale(locale.as_str(), &self.context.prefixed_name(name))?,
                ),
                None => None,
            };

            let localized_uri = match self.urls.as_ref().and_then(|urls| urls.get(locale.as_str())) {
                Some(url) => self.context.prefixed_uri(url),
                None => self
                    .transformer
                    .switch_url_locale(locale.as_str(), &self.context.prefixed_uri(uri))?,
            };

            let shared = self.urls.as_ref().map(LocaleUrls::shared_middleware).unwrap_or_default();
            let middleware = session_middleware(
                self.context
                    .middleware()
                    .iter()
                    .chain(&action.attributes.middleware)
                    .chain(shared),
                &locale,
            );

            let mut attributes = action.attributes.clone();
            attributes.name = name;
            attributes.middleware = Vec::new();
            attributes.locale = Some(LocaleAttr::from(&locale));

            debug!(
                "Registering {:?} /{} as {:?} for locale {}",
                verbs, localized_uri, attributes.name, locale
            );

            let localized = Action::with_attributes(action.handler.clone(), attributes);
            self.registrar
                .add_route(verbs, &localized_uri, localized)?
                .middleware(middleware);
        }

        Ok(())
    }

    /// Declare routes sharing `attributes`.
    ///
    /// Without a locale (on the group or an enclosing one) the callback runs
    /// once per active locale, each time under a `<locale>/` prefix, a
    /// `<locale>.` name prefix and the `locale.session:<locale>` middleware.
    /// Routes declared inside inherit that locale and are registered once
    /// per run.
    pub fn group<F>(&mut self, attributes: Attributes, mut callback: F) -> RouteResult<()>
    where
        F: FnMut(&mut LocaleRouter<'_, R>) -> RouteResult<()>,
    {
        let merged = self.context.merge(&attributes);

        for locale in self.target_locales(&attributes)? {
            let name_prefix = if merged.name_prefix().is_empty() {
                format!("{}.", locale)
            } else {
                self.transformer
                    .switch_route_locale(locale.as_str(), merged.name_prefix())?
            };
            let prefix = self
                .transformer
                .switch_url_locale(locale.as_str(), merged.prefix())?;
            let middleware = session_middleware(merged.middleware(), &locale);

            let context = merged
                .clone()
                .with_prefix(prefix)
                .with_name_prefix(name_prefix)
                .with_middleware(middleware)
                .with_locale(LocaleAttr::from(&locale));

            debug!(
                "Entering group /{} ({}) for locale {}",
                context.prefix(),
                context.name_prefix(),
                locale
            );

            let mut scoped = self.scoped(context, None);
            callback(&mut scoped)?;
        }

        Ok(())
    }

    /// Register the resource routes of `name` once per target locale.
    ///
    /// With locales `fr` and `en`, `resource("article", …)` registers
    /// `fr.article.index` at `fr/article`, `en.article.show` at
    /// `en/article/{article}` and so on.
    pub fn resource(
        &mut self,
        name: &str,
        resource: &Resource<R::Handler>,
        options: ResourceOptions,
    ) -> RouteResult<()> {
        for locale in self.target_locales(&Attributes::default())? {
            let localized_name = self
                .transformer
                .switch_route_locale(locale.as_str(), &self.context.prefixed_name(name))?;
            let uri = self.transformer.switch_url_locale(
                locale.as_str(),
                &self.context.prefixed_uri(&name.replace('.', "/")),
            )?;

            let mut localized_options = options.clone();
            localized_options.middleware = session_middleware(
                self.context.middleware().iter().chain(&options.middleware),
                &locale,
            );

            debug!("Registering resource {} at /{}", localized_name, uri);
            self.registrar
                .resource(&localized_name, &uri, resource, &localized_options)?;
        }

        Ok(())
    }

    fn target_locales(&self, attributes: &Attributes) -> RouteResult<Vec<Locale>> {
        match self.resolver.effective_locale(&self.context, attributes)? {
            Some(locale) => Ok(vec![locale]),
            None => Ok(self.config().locales().to_vec()),
        }
    }

    fn scoped(&mut self, context: GroupContext, urls: Option<LocaleUrls>) -> LocaleRouter<'_, R> {
        LocaleRouter {
            registrar: &mut *self.registrar,
            transformer: self.transformer.clone(),
            resolver: self.resolver.clone(),
            context,
            urls,
        }
    }
}
