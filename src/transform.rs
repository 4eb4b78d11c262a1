//! Locale prefix handling for route names and URIs.
//!
//! Route names carry their locale as a `<locale>.` prefix (`fr.route`) and
//! URIs as a `<locale>/` prefix (`fr/test`). Switching a value to another
//! locale replaces an existing prefix instead of stacking a new one, so every
//! operation here is idempotent.

use crate::config::LocaleConfig;
use crate::error::LocaleResult;
use crate::locale::Locale;
use std::sync::Arc;

const NAME_SEPARATOR: char = '.';
const URL_SEPARATOR: char = '/';

/// Pure name/URI transformations driven by the active locale set.
#[derive(Debug, Clone)]
pub struct LocaleTransformer {
    config: Arc<LocaleConfig>,
}

impl LocaleTransformer {
    pub fn new(config: Arc<LocaleConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocaleConfig {
        &self.config
    }

    /// Give a route name the prefix of `locale`.
    ///
    /// # Arguments
    /// * `locale` - An active locale code
    /// * `name` - Route name, with or without a locale prefix
    ///
    /// # Returns
    /// * `Ok("")` for an empty name
    /// * `Ok("<locale>.<name>")` with any other locale prefix replaced
    /// * `Err(InvalidLocale)` if `locale` is not active
    pub fn switch_route_locale(&self, locale: &str, name: &str) -> LocaleResult<String> {
        let locale = self.config.ensure_active(locale)?;

        if name.is_empty() {
            return Ok(String::new());
        }

        let base = self.strip_route_locale(name);
        Ok(format!("{}{}{}", locale, NAME_SEPARATOR, base))
    }

    /// Give a URI the prefix of `locale`.
    ///
    /// Leading and trailing slashes are dropped. When the locale has no URL
    /// prefix (default locale with `add_locale_to_url` off), any existing
    /// locale prefix is removed instead.
    pub fn switch_url_locale(&self, locale: &str, uri: &str) -> LocaleResult<String> {
        let locale = self.config.ensure_active(locale)?;
        let base = self.strip_url_locale(uri);

        if !self.config.has_url_prefix(locale) {
            return Ok(base.to_string());
        }

        if base.is_empty() {
            Ok(locale.to_string())
        } else {
            Ok(format!("{}{}{}", locale, URL_SEPARATOR, base))
        }
    }

    /// Remove a configured locale prefix from a route name.
    pub fn strip_route_locale<'n>(&self, name: &'n str) -> &'n str {
        match self.split_prefix(name, NAME_SEPARATOR) {
            Some((_, rest)) => rest,
            None => name,
        }
    }

    /// Remove a configured locale prefix from a URI, normalizing slashes.
    pub fn strip_url_locale<'u>(&self, uri: &'u str) -> &'u str {
        let uri = uri.trim_matches(URL_SEPARATOR);

        if self.config.is_active(uri) {
            return "";
        }

        match self.split_prefix(uri, URL_SEPARATOR) {
            Some((_, rest)) => rest,
            None => uri,
        }
    }

    /// The locale a route name is prefixed with, if any.
    pub fn route_locale(&self, name: &str) -> Option<&Locale> {
        self.split_prefix(name, NAME_SEPARATOR)
            .map(|(locale, _)| locale)
    }

    /// The locale a URI is prefixed with, if any.
    pub fn url_locale(&self, uri: &str) -> Option<&Locale> {
        let uri = uri.trim_matches(URL_SEPARATOR);
        self.config
            .locales()
            .iter()
            .find(|locale| *locale == uri)
            .or_else(|| self.split_prefix(uri, URL_SEPARATOR).map(|(locale, _)| locale))
    }

    fn split_prefix<'v>(&self, value: &'v str, separator: char) -> Option<(&Locale, &'v str)> {
        let (head, rest) = value.split_once(separator)?;
        self.config
            .locales()
            .iter()
            .find(|locale| *locale == head)
            .map(|locale| (locale, rest))
    }
}
