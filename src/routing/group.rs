use crate::locale::LocaleAttr;
use crate::routing::action::Attributes;
use crate::routing::route::normalize_uri;

/// Attributes inherited by routes declared inside a group.
///
/// Contexts are immutable: entering a nested group produces a new context
/// with `merge`, the enclosing one is left as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupContext {
    prefix: String,
    name_prefix: String,
    middleware: Vec<String>,
    locale: Option<LocaleAttr>,
}

impl GroupContext {
    /// The context outside of any group.
    pub fn root() -> Self {
        Self::default()
    }

    /// Context of a group declared with `attributes` inside this one.
    ///
    /// Prefixes are joined with `/`, name prefixes concatenated, middleware
    /// appended. A locale on the inner group replaces the inherited one.
    pub fn merge(&self, attributes: &Attributes) -> Self {
        let mut middleware = self.middleware.clone();
        middleware.extend(attributes.middleware.iter().cloned());

        Self {
            prefix: self.prefixed_uri(attributes.prefix.as_deref().unwrap_or_default()),
            name_prefix: self.prefixed_name(attributes.name.as_deref().unwrap_or_default()),
            middleware,
            locale: attributes.locale.clone().or_else(|| self.locale.clone()),
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: String) -> Self {
        self.prefix = normalize_uri(&prefix);
        self
    }

    pub(crate) fn with_name_prefix(mut self, name_prefix: String) -> Self {
        self.name_prefix = name_prefix;
        self
    }

    pub(crate) fn with_middleware(mut self, middleware: Vec<String>) -> Self {
        self.middleware = middleware;
        self
    }

    pub(crate) fn with_locale(mut self, locale: LocaleAttr) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }

    pub fn locale(&self) -> Option<&LocaleAttr> {
        self.locale.as_ref()
    }

    /// `uri` under the group prefix.
    pub fn prefixed_uri(&self, uri: &str) -> String {
        normalize_uri(&format!("{}/{}", self.prefix, uri))
    }

    /// `name` under the group name prefix.
    pub fn prefixed_name(&self, name: &str) -> String {
        format!("{}{}", self.name_prefix, name)
    }
}
