//! URL generation for localized routes.

use crate::config::LocaleConfig;
use crate::error::{LocaleError, RouteError, RouteResult};
use crate::locale::Locale;
use crate::routing::route::normalize_uri;
use crate::transform::LocaleTransformer;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

/// Route parameters, by placeholder name. Values without a matching
/// placeholder end up in the query string.
pub type Parameters = BTreeMap<String, String>;

/// Build a `Parameters` map from pairs.
pub fn parameters<I, K, V>(pairs: I) -> Parameters
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.to_string()))
        .collect()
}

/// Builds URLs for named routes.
pub trait UrlGenerator {
    /// # Returns
    /// * `Err(RouteNotFound)` if no route carries `name`
    /// * `Err(MissingParameter)` if a required placeholder has no value
    fn route(&self, name: &str, parameters: &Parameters, absolute: bool) -> RouteResult<String>;
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{(\w+)(\?)?\}").expect("valid placeholder regex"))
}

/// Whether the last segment of `uri` is an optional placeholder (`{page?}`).
pub(crate) fn has_optional_tail(uri: &str) -> bool {
    let last = uri.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    placeholder_regex()
        .captures(last)
        .is_some_and(|caps| caps.get(2).is_some() && &caps[0] == last)
}

/// Fill the placeholders of `uri` and turn it into a URL.
///
/// Relative URLs start with `/`; absolute ones are joined to `base_url`.
pub(crate) fn format_url(
    name: &str,
    uri: &str,
    parameters: &Parameters,
    base_url: Option<&str>,
) -> RouteResult<String> {
    let mut used = BTreeSet::new();
    let mut missing = None;

    let path = placeholder_regex().replace_all(uri, |caps: &Captures| {
        let key = &caps[1];
        match parameters.get(key) {
            Some(value) => {
                used.insert(key.to_string());
                encode_segment(value)
            }
            None => {
                if caps.get(2).is_none() && missing.is_none() {
                    missing = Some(key.to_string());
                }
                String::new()
            }
        }
    });

    if let Some(parameter) = missing {
        return Err(RouteError::MissingParameter {
            name: name.to_string(),
            parameter,
        });
    }

    let path = normalize_uri(&path);
    let mut url = match base_url {
        Some(base) if path.is_empty() => base.trim_end_matches('/').to_string(),
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), path),
        None => format!("/{}", path),
    };

    let query: Vec<(&String, &String)> = parameters
        .iter()
        .filter(|(key, _)| !used.contains(key.as_str()))
        .collect();
    if !query.is_empty() {
        let query = ::url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        url.push('?');
        url.push_str(&query);
    }

    Ok(url)
}

fn encode_segment(value: &str) -> String {
    ::url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Locale-aware URL helper for application code.
///
/// The current locale is the one set with `with_current_locale`, else the
/// locale prefix of the current route, else the configured default.
pub struct UrlHelper<'g, G: UrlGenerator> {
    generator: &'g G,
    transformer: LocaleTransformer,
    current_locale: Option<Locale>,
    current_route: Option<String>,
}

impl<'g, G: UrlGenerator> UrlHelper<'g, G> {
    pub fn new(generator: &'g G, config: Arc<LocaleConfig>) -> Self {
        Self {
            generator,
            transformer: LocaleTransformer::new(config),
            current_locale: None,
            current_route: None,
        }
    }

    /// Set the locale of the current request. It must be active.
    pub fn with_current_locale(mut self, locale: &str) -> RouteResult<Self> {
        let locale = self.transformer.config().ensure_active(locale)?.clone();
        self.current_locale = Some(locale);
        Ok(self)
    }

    /// Set the name of the route matched by the current request.
    pub fn with_current_route(mut self, name: impl Into<String>) -> Self {
        self.current_route = Some(name.into());
        self
    }

    pub fn current_locale(&self) -> &Locale {
        self.current_locale
            .as_ref()
            .or_else(|| {
                self.current_route
                    .as_deref()
                    .and_then(|name| self.transformer.route_locale(name))
            })
            .unwrap_or_else(|| self.transformer.config().default_locale())
    }

    /// URL of route `name` in `locale` (the current locale when `None`).
    pub fn locale_route(
        &self,
        locale: Option<&str>,
        name: &str,
        parameters: &Parameters,
        absolute: bool,
    ) -> RouteResult<String> {
        let locale = match locale {
            Some(code) => code,
            None => self.current_locale().as_str(),
        };
        let name = self.transformer.switch_route_locale(locale, name)?;
        self.generator.route(&name, parameters, absolute)
    }

    /// URL of the current route in another locale.
    pub fn other_locale(
        &self,
        locale: &str,
        parameters: &Parameters,
        absolute: bool,
    ) -> RouteResult<String> {
        let current = self.current_route.as_deref().ok_or_else(|| {
            LocaleError::invalid_configuration("no current route to switch locale for")
        })?;
        let name = self.transformer.strip_route_locale(current);
        self.locale_route(Some(locale), name, parameters, absolute)
    }

    /// URL of another route in the current locale.
    pub fn other_route(&self, name: &str, parameters: &Parameters, absolute: bool) -> RouteResult<String> {
        self.locale_route(None, name, parameters, absolute)
    }
}
