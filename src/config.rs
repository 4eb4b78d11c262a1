use crate::error::{LocaleError, LocaleResult};
use crate::locale::Locale;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Localization settings, read once at boot and passed to every component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLocaleConfig")]
pub struct LocaleConfig {
    // Active locales, in registration order
    locales: Vec<Locale>,

    // Whether the default locale also gets a URL prefix
    add_locale_to_url: bool,

    default_locale: Locale,
}

#[derive(Debug, Deserialize)]
struct RawLocaleConfig {
    locales: Vec<Locale>,
    #[serde(default = "default_add_locale_to_url")]
    add_locale_to_url: bool,
    #[serde(default)]
    default_locale: Option<Locale>,
}

fn default_add_locale_to_url() -> bool {
    true
}

impl TryFrom<RawLocaleConfig> for LocaleConfig {
    type Error = LocaleError;

    fn try_from(raw: RawLocaleConfig) -> Result<Self, Self::Error> {
        let config = Self::new(raw.locales, raw.add_locale_to_url)?;
        match raw.default_locale {
            Some(locale) => config.with_default_locale(locale),
            None => Ok(config),
        }
    }
}

impl LocaleConfig {
    /// Create a configuration from an ordered locale list.
    ///
    /// The first locale is the default one until `with_default_locale` says
    /// otherwise.
    pub fn new(locales: Vec<Locale>, add_locale_to_url: bool) -> LocaleResult<Self> {
        let Some(first) = locales.first().cloned() else {
            return Err(LocaleError::invalid_configuration(
                "at least one active locale is required",
            ));
        };

        for (i, locale) in locales.iter().enumerate() {
            if locales[..i].contains(locale) {
                return Err(LocaleError::invalid_configuration(format!(
                    "locale '{}' is listed twice",
                    locale
                )));
            }
        }

        Ok(Self {
            locales,
            add_locale_to_url,
            default_locale: first,
        })
    }

    /// Convenience constructor from plain codes.
    pub fn from_codes(codes: &[&str], add_locale_to_url: bool) -> LocaleResult<Self> {
        let locales = codes
            .iter()
            .map(|code| code.parse())
            .collect::<LocaleResult<Vec<Locale>>>()?;
        Self::new(locales, add_locale_to_url)
    }

    /// Set the default locale. It must be one of the active locales.
    pub fn with_default_locale(mut self, locale: Locale) -> LocaleResult<Self> {
        if !self.locales.contains(&locale) {
            return Err(LocaleError::invalid_locale(locale.as_str()));
        }
        self.default_locale = locale;
        Ok(self)
    }

    /// Load the configuration from environment variables.
    ///
    /// * `LOCALE_ROUTE_LOCALES` - comma separated codes (default "en")
    /// * `LOCALE_ROUTE_ADD_LOCALE_TO_URL` - "true"/"false" (default true)
    /// * `LOCALE_ROUTE_DEFAULT_LOCALE` - optional default locale
    pub fn from_env() -> Result<Self> {
        let locales = std::env::var("LOCALE_ROUTE_LOCALES").unwrap_or_else(|_| "en".to_string());
        let locales = locales
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::parse)
            .collect::<LocaleResult<Vec<Locale>>>()
            .context("LOCALE_ROUTE_LOCALES contains an invalid locale code")?;

        let add_locale_to_url = match std::env::var("LOCALE_ROUTE_ADD_LOCALE_TO_URL") {
            Ok(value) => value
                .trim()
                .parse()
                .context("LOCALE_ROUTE_ADD_LOCALE_TO_URL must be true or false")?,
            Err(_) => default_add_locale_to_url(),
        };

        let config = Self::new(locales, add_locale_to_url)?;

        match std::env::var("LOCALE_ROUTE_DEFAULT_LOCALE") {
            Ok(code) => {
                let locale: Locale = code
                    .parse()
                    .context("LOCALE_ROUTE_DEFAULT_LOCALE is not a valid locale code")?;
                Ok(config.with_default_locale(locale)?)
            }
            Err(_) => Ok(config),
        }
    }

    /// Load the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse locale config {}", path.display()))
    }

    /// Active locales in configured order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn add_locale_to_url(&self) -> bool {
        self.add_locale_to_url
    }

    pub fn is_active(&self, code: &str) -> bool {
        self.locales.iter().any(|locale| locale == code)
    }

    /// Return the active locale matching `code`, or `InvalidLocale`.
    pub fn ensure_active(&self, code: &str) -> LocaleResult<&Locale> {
        self.locales
            .iter()
            .find(|locale| *locale == code)
            .ok_or_else(|| LocaleError::invalid_locale(code))
    }

    /// Whether URIs of this locale carry a `<locale>/` prefix.
    ///
    /// Only the default locale can go without one, when
    /// `add_locale_to_url` is off.
    pub fn has_url_prefix(&self, locale: &Locale) -> bool {
        self.add_locale_to_url || *locale != self.default_locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("LOCALE_ROUTE_LOCALES");
        std::env::remove_var("LOCALE_ROUTE_ADD_LOCALE_TO_URL");
        std::env::remove_var("LOCALE_ROUTE_DEFAULT_LOCALE");
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_first_locale_is_default() {
        let config = LocaleConfig::from_codes(&["fr", "en"], true).unwrap();
        assert_eq!(config.default_locale(), "fr");
        assert_eq!(config.locales().len(), 2);
    }

    #[test]
    fn test_empty_locale_list_rejected() {
        let err = LocaleConfig::new(vec![], true).unwrap_err();
        assert!(matches!(err, LocaleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicate_locale_rejected() {
        let err = LocaleConfig::from_codes(&["fr", "en", "fr"], true).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_default_locale_must_be_active() {
        let config = LocaleConfig::from_codes(&["fr", "en"], true).unwrap();
        let err = config
            .with_default_locale(Locale::new("de").unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            LocaleError::InvalidLocale {
                locale: "de".to_string()
            }
        );
    }

    #[test]
    fn test_ensure_active() {
        let config = LocaleConfig::from_codes(&["fr", "en"], true).unwrap();
        assert_eq!(config.ensure_active("en").unwrap(), "en");
        assert!(config.ensure_active("es").is_err());
    }

    #[test]
    fn test_has_url_prefix() {
        let config = LocaleConfig::from_codes(&["en", "fr"], false).unwrap();
        assert!(!config.has_url_prefix(&Locale::new("en").unwrap()));
        assert!(config.has_url_prefix(&Locale::new("fr").unwrap()));

        let config = LocaleConfig::from_codes(&["en", "fr"], true).unwrap();
        assert!(config.has_url_prefix(&Locale::new("en").unwrap()));
    }

    // ==================== Deserialization Tests ====================

    #[test]
    fn test_deserialize_with_defaults() {
        let config: LocaleConfig = serde_json::from_str(r#"{"locales": ["fr", "en"]}"#).unwrap();
        assert!(config.add_locale_to_url());
        assert_eq!(config.default_locale(), "fr");
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<LocaleConfig>(r#"{"locales": []}"#).is_err());
        assert!(serde_json::from_str::<LocaleConfig>(
            r#"{"locales": ["fr"], "default_locale": "en"}"#
        )
        .is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"locales": ["en", "fr"], "add_locale_to_url": false, "default_locale": "en"}}"#
        )
        .expect("write config");

        let config = LocaleConfig::from_file(file.path()).unwrap();
        assert_eq!(config.locales().len(), 2);
        assert!(!config.add_locale_to_url());
    }

    #[test]
    fn test_from_file_missing() {
        let result = LocaleConfig::from_file("/nonexistent/locales.json");
        assert!(result.is_err());
    }

    // ==================== Environment Tests ====================

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = LocaleConfig::from_env().unwrap();
        assert_eq!(config.locales().len(), 1);
        assert_eq!(config.default_locale(), "en");
        assert!(config.add_locale_to_url());
    }

    #[test]
    #[serial]
    fn test_from_env_values() {
        clear_env();
        std::env::set_var("LOCALE_ROUTE_LOCALES", "fr, en ,es");
        std::env::set_var("LOCALE_ROUTE_ADD_LOCALE_TO_URL", "false");
        std::env::set_var("LOCALE_ROUTE_DEFAULT_LOCALE", "en");

        let config = LocaleConfig::from_env().unwrap();
        clear_env();

        let codes: Vec<&str> = config.locales().iter().map(Locale::as_str).collect();
        assert_eq!(codes, vec!["fr", "en", "es"]);
        assert!(!config.add_locale_to_url());
        assert_eq!(config.default_locale(), "en");
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_flag() {
        clear_env();
        std::env::set_var("LOCALE_ROUTE_ADD_LOCALE_TO_URL", "maybe");
        let result = LocaleConfig::from_env();
        clear_env();
        assert!(result.is_err());
    }
}
