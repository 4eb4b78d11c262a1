//! Route actions and their attributes.

use crate::error::{LocaleError, LocaleResult};
use crate::locale::LocaleAttr;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// HTTP verbs a route can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Verb {
    pub const ALL: [Verb; 6] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of a route or a route group.
///
/// The same keys apply to both: on a route `as` is its name, on a group it
/// is the name prefix given to every route inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attributes {
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middleware: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<LocaleAttr>,

    /// Attributes this crate does not interpret, kept as given
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
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

    pub fn locale(mut self, locale: impl Into<LocaleAttr>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parse attributes from a JSON object.
    ///
    /// `middleware` may be a single string or a list of strings; `locale`
    /// follows `LocaleAttr::from_value`. Unknown keys end up in `extra`.
    pub fn from_value(value: Value) -> LocaleResult<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(LocaleError::invalid_configuration(format!(
                    "attributes must be an object, found {}",
                    other
                )))
            }
        };

        let mut attributes = Self::new();
        for (key, value) in object {
            match key.as_str() {
                "as" => attributes.name = optional_string(&key, value)?,
                "prefix" => attributes.prefix = optional_string(&key, value)?,
                "middleware" => attributes.middleware = string_list(&key, value)?,
                "locale" => attributes.locale = LocaleAttr::from_value(&value)?,
                _ => {
                    attributes.extra.insert(key, value);
                }
            }
        }

        Ok(attributes)
    }
}

fn optional_string(key: &str, value: Value) -> LocaleResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(LocaleError::invalid_configuration(format!(
            "'{}' must be a string, found {}",
            key, other
        ))),
    }
}

/// Read a string or a list of strings; a scalar becomes a one-element list.
pub(crate) fn string_list(key: &str, value: Value) -> LocaleResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(LocaleError::invalid_configuration(format!(
                    "'{}' may only contain strings, found {}",
                    key, other
                ))),
            })
            .collect(),
        other => Err(LocaleError::invalid_configuration(format!(
            "'{}' must be a string or a list of strings, found {}",
            key, other
        ))),
    }
}

/// A route handler together with the attributes it was declared with.
#[derive(Debug, Clone, PartialEq)]
pub struct Action<H> {
    pub handler: H,
    pub attributes: Attributes,
}

impl<H> Action<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            attributes: Attributes::default(),
        }
    }

    pub fn with_attributes(handler: H, attributes: Attributes) -> Self {
        Self {
            handler,
            attributes,
        }
    }

    /// Set the route name (`as`).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.attributes.name = Some(name.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<LocaleAttr>) -> Self {
        self.attributes.locale = Some(locale.into());
        self
    }

    pub fn middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .middleware
            .extend(middleware.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verb_display() {
        assert_eq!(Verb::Get.to_string(), "GET");
        assert_eq!(Verb::ALL.len(), 6);
    }

    #[test]
    fn test_attributes_builder() {
        let attributes = Attributes::new()
            .named("group.")
            .prefix("group")
            .middleware(["auth"])
            .locale("fr");

        assert_eq!(attributes.name.as_deref(), Some("group."));
        assert_eq!(attributes.prefix.as_deref(), Some("group"));
        assert_eq!(attributes.middleware, vec!["auth"]);
        assert_eq!(attributes.locale, Some(LocaleAttr::from("fr")));
    }

    #[test]
    fn test_attributes_from_value() {
        let attributes = Attributes::from_value(json!({
            "as": "group.",
            "prefix": "group",
            "middleware": "auth",
            "locale": ["fr", "en"],
            "domain": "example.com"
        }))
        .unwrap();

        assert_eq!(attributes.name.as_deref(), Some("group."));
        assert_eq!(attributes.middleware, vec!["auth"]);
        assert_eq!(attributes.locale, Some(LocaleAttr::from(vec!["fr", "en"])));
        assert_eq!(attributes.extra.get("domain"), Some(&json!("example.com")));
    }

    #[test]
    fn test_attributes_from_value_rejects_garbage() {
        assert!(Attributes::from_value(json!("group")).is_err());
        assert!(Attributes::from_value(json!({"locale": {"fr": true}})).is_err());
        assert!(Attributes::from_value(json!({"middleware": [1, 2]})).is_err());
        assert!(Attributes::from_value(json!({"as": 3})).is_err());
    }

    #[test]
    fn test_attributes_serialize_uses_as_key() {
        let value = serde_json::to_value(Attributes::new().named("route")).unwrap();
        assert_eq!(value, json!({"as": "route"}));
    }

    #[test]
    fn test_action_builder() {
        let action = Action::new("handler")
            .named("route")
            .locale("fr")
            .middleware(["guest", "auth"]);

        assert_eq!(action.name(), Some("route"));
        assert_eq!(action.attributes.middleware, vec!["guest", "auth"]);
        assert_eq!(action.handler, "handler");
    }
}
