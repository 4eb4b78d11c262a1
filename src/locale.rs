//! Locale codes and the `locale` route attribute.

use crate::error::{LocaleError, LocaleResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Name of the middleware alias that records the visitor's locale.
pub const SESSION_MIDDLEWARE: &str = "locale.session";

/// A syntactically valid locale code (e.g. "fr", "en", "pt-br").
///
/// Codes may not contain `.` or `/` since those separate the locale prefix
/// from route names and URIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a code, validating its syntax only.
    ///
    /// Whether the locale is active is decided by `LocaleConfig`.
    pub fn new(code: impl Into<String>) -> LocaleResult<Self> {
        let code = code.into();
        let valid = !code.is_empty()
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(LocaleError::invalid_configuration(format!(
                "'{}' is not a valid locale code",
                code
            )));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `locale.session:<locale>` middleware token for this locale.
    pub fn session_middleware(&self) -> String {
        format!("{}:{}", SESSION_MIDDLEWARE, self.0)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The value of a `locale` attribute on a route or group.
///
/// A list is accepted for compatibility with route files that stack locale
/// declarations; only its last element is ever used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleAttr {
    One(String),
    Many(Vec<String>),
}

impl LocaleAttr {
    /// The code that applies: the value itself, or the last list element.
    /// An empty code means no locale.
    pub fn last(&self) -> Option<&str> {
        let code = match self {
            Self::One(code) => Some(code.as_str()),
            Self::Many(codes) => codes.last().map(String::as_str),
        };
        code.filter(|code| !code.is_empty())
    }

    /// Read a `locale` attribute out of a JSON value.
    ///
    /// Strings and arrays of strings are accepted; `null` means no locale.
    /// Anything else is an `InvalidConfiguration` error.
    pub fn from_value(value: &Value) -> LocaleResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(code) => Ok(Some(Self::One(code.clone()))),
            Value::Array(items) => {
                let codes = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            LocaleError::invalid_configuration(format!(
                                "locale list may only contain strings, found {}",
                                item
                            ))
                        })
                    })
                    .collect::<LocaleResult<Vec<_>>>()?;
                Ok(Some(Self::Many(codes)))
            }
            other => Err(LocaleError::invalid_configuration(format!(
                "locale attribute must be a string or a list of strings, found {}",
                other
            ))),
        }
    }
}

impl From<&str> for LocaleAttr {
    fn from(code: &str) -> Self {
        Self::One(code.to_string())
    }
}

impl From<String> for LocaleAttr {
    fn from(code: String) -> Self {
        Self::One(code)
    }
}

impl From<&Locale> for LocaleAttr {
    fn from(locale: &Locale) -> Self {
        Self::One(locale.as_str().to_string())
    }
}

impl From<Locale> for LocaleAttr {
    fn from(locale: Locale) -> Self {
        Self::One(locale.0)
    }
}

impl From<Vec<&str>> for LocaleAttr {
    fn from(codes: Vec<&str>) -> Self {
        Self::Many(codes.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Locale Tests ====================

    #[test]
    fn test_locale_accepts_short_codes() {
        assert_eq!(Locale::new("fr").unwrap().as_str(), "fr");
        assert_eq!(Locale::new("pt-br").unwrap().as_str(), "pt-br");
        assert_eq!(Locale::new("zh_Hant").unwrap().as_str(), "zh_Hant");
    }

    #[test]
    fn test_locale_rejects_separators() {
        assert!(Locale::new("fr.ca").is_err());
        assert!(Locale::new("fr/ca").is_err());
        assert!(Locale::new("").is_err());
    }

    #[test]
    fn test_locale_from_str_trims() {
        let locale: Locale = " en ".parse().unwrap();
        assert_eq!(locale, "en");
    }

    #[test]
    fn test_session_middleware_token() {
        let locale = Locale::new("fr").unwrap();
        assert_eq!(locale.session_middleware(), "locale.session:fr");
    }

    #[test]
    fn test_locale_deserialize_validates() {
        let locale: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(locale, "en");
        assert!(serde_json::from_str::<Locale>("\"e.n\"").is_err());
    }

    // ==================== LocaleAttr Tests ====================

    #[test]
    fn test_attr_last_of_list_wins() {
        let attr = LocaleAttr::from(vec!["fr", "en"]);
        assert_eq!(attr.last(), Some("en"));
    }

    #[test]
    fn test_attr_empty_values() {
        assert_eq!(LocaleAttr::Many(vec![]).last(), None);
        assert_eq!(LocaleAttr::from("").last(), None);
        assert_eq!(LocaleAttr::from(vec!["fr", ""]).last(), None);
        assert_eq!(LocaleAttr::from(vec!["", "fr"]).last(), Some("fr"));
    }

    #[test]
    fn test_attr_from_value() {
        assert_eq!(
            LocaleAttr::from_value(&json!("fr")).unwrap(),
            Some(LocaleAttr::from("fr"))
        );
        assert_eq!(
            LocaleAttr::from_value(&json!(["fr", "en"])).unwrap(),
            Some(LocaleAttr::from(vec!["fr", "en"]))
        );
        assert_eq!(LocaleAttr::from_value(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_attr_from_malformed_value() {
        let err = LocaleAttr::from_value(&json!(42)).unwrap_err();
        assert!(matches!(err, LocaleError::InvalidConfiguration(_)));

        let err = LocaleAttr::from_value(&json!(["fr", 1])).unwrap_err();
        assert!(matches!(err, LocaleError::InvalidConfiguration(_)));
    }
}
