use crate::locale::LocaleAttr;
use crate::routing::action::{Action, Verb};
use serde::Serialize;

/// A registered route: verbs, URI template and action.
///
/// URIs are stored without leading or trailing slashes (`fr/test`) and may
/// contain `{param}` and `{param?}` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<H> {
    verbs: Vec<Verb>,
    uri: String,
    action: Action<H>,
}

impl<H> Route<H> {
    pub fn new(verbs: &[Verb], uri: &str, action: Action<H>) -> Self {
        Self {
            verbs: verbs.to_vec(),
            uri: normalize_uri(uri),
            action,
        }
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: &str) -> &mut Self {
        self.uri = normalize_uri(uri);
        self
    }

    /// The route name, taken from the `as` action attribute.
    pub fn name(&self) -> Option<&str> {
        self.action.name()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.action.attributes.name = Some(name.into());
        self
    }

    pub fn action(&self) -> &Action<H> {
        &self.action
    }

    pub fn set_action(&mut self, action: Action<H>) -> &mut Self {
        self.action = action;
        self
    }

    pub fn handler(&self) -> &H {
        &self.action.handler
    }

    pub fn locale(&self) -> Option<&LocaleAttr> {
        self.action.attributes.locale.as_ref()
    }

    /// Attach middleware to the route, skipping entries it already has.
    pub fn middleware<I, S>(&mut self, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in middleware {
            let entry = entry.into();
            if !self.action.attributes.middleware.contains(&entry) {
                self.action.attributes.middleware.push(entry);
            }
        }
        self
    }

    /// Middleware attached to the route, in order.
    pub fn gather_middleware(&self) -> &[String] {
        &self.action.attributes.middleware
    }

    /// Serializable view without the handler.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            verbs: self.verbs.clone(),
            uri: format!("/{}", self.uri),
            name: self.name().map(str::to_string),
            middleware: self.action.attributes.middleware.clone(),
        }
    }
}

/// Name/URI listing entry of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub verbs: Vec<Verb>,
    pub uri: String,
    pub name: Option<String>,
    pub middleware: Vec<String>,
}

pub(crate) fn normalize_uri(uri: &str) -> String {
    uri.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route<&'static str> {
        Route::new(&[Verb::Get], "/test/", Action::new("handler").named("route"))
    }

    #[test]
    fn test_uri_is_normalized() {
        assert_eq!(route().uri(), "test");

        let mut route = route();
        route.set_uri("//fr//test/");
        assert_eq!(route.uri(), "fr/test");
    }

    #[test]
    fn test_name_lives_in_action() {
        let mut route = route();
        assert_eq!(route.name(), Some("route"));

        route.set_name("fr.route");
        assert_eq!(route.action().attributes.name.as_deref(), Some("fr.route"));
    }

    #[test]
    fn test_middleware_is_deduplicated() {
        let mut route = route();
        route.middleware(["auth", "guest"]).middleware(["auth"]);
        assert_eq!(route.gather_middleware(), ["auth", "guest"]);
    }

    #[test]
    fn test_summary() {
        let summary = route().summary();
        assert_eq!(summary.uri, "/test");
        assert_eq!(summary.name.as_deref(), Some("route"));
        assert_eq!(summary.verbs, vec![Verb::Get]);
    }
}
