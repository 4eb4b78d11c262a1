//! In-memory route collection.

use crate::error::{RouteError, RouteResult};
use crate::routing::action::{Action, Verb};
use crate::routing::decorator::RouteDecorator;
use crate::routing::registrar::Registrar;
use crate::routing::route::{normalize_uri, Route, RouteSummary};
use crate::url::{format_url, has_optional_tail, placeholder_regex, Parameters, UrlGenerator};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://localhost";

/// A flat route table that acts as the host router and URL generator.
///
/// Registration fails when a route name or a (verb, URI pattern) pair is
/// already taken. URI patterns compare equal regardless of placeholder
/// names, so `post/{id}` and `post/{slug}` collide.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
    base_url: String,
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Base URL of absolute URLs (default "http://localhost").
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&Route<H>> {
        self.routes.iter().find(|route| route.name() == Some(name))
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// The route answering `verb` at `uri` (compared as a pattern).
    pub fn find(&self, verb: Verb, uri: &str) -> Option<&Route<H>> {
        let pattern = pattern_key(uri);
        self.routes.iter().find(|route| {
            route.verbs().contains(&verb) && pattern_keys(route.uri()).contains(&pattern)
        })
    }

    /// Name, URI, verbs and middleware of every route, in registration order.
    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(Route::summary).collect()
    }
}

impl<H: Clone> RouteTable<H> {
    /// Apply `decorator` to every route, then check the table is still free
    /// of duplicate names and routes.
    ///
    /// The table is left untouched when localizing fails.
    pub fn localize(&mut self, decorator: &RouteDecorator) -> RouteResult<()> {
        let mut routes = self.routes.clone();
        for route in &mut routes {
            decorator.add_locale(route)?;
        }

        for (index, route) in routes.iter().enumerate() {
            if let Some(err) = routes[..index]
                .iter()
                .find_map(|existing| conflict(existing, route))
            {
                return Err(err);
            }
        }

        self.routes = routes;
        Ok(())
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> Registrar for RouteTable<H> {
    type Handler = H;

    fn add_route(&mut self, verbs: &[Verb], uri: &str, action: Action<H>) -> RouteResult<&mut Route<H>> {
        let route = Route::new(verbs, uri, action);

        if let Some(err) = self
            .routes
            .iter()
            .find_map(|existing| conflict(existing, &route))
        {
            return Err(err);
        }

        debug!("Registered {:?} /{} as {:?}", route.verbs(), route.uri(), route.name());

        let index = self.routes.len();
        self.routes.push(route);
        Ok(&mut self.routes[index])
    }
}

impl<H> UrlGenerator for RouteTable<H> {
    fn route(&self, name: &str, parameters: &Parameters, absolute: bool) -> RouteResult<String> {
        let route = self.by_name(name).ok_or_else(|| RouteError::RouteNotFound {
            name: name.to_string(),
        })?;

        let base_url = absolute.then_some(self.base_url.as_str());
        format_url(name, route.uri(), parameters, base_url)
    }
}

fn conflict<H>(existing: &Route<H>, candidate: &Route<H>) -> Option<RouteError> {
    if let (Some(a), Some(b)) = (existing.name(), candidate.name()) {
        if a == b {
            return Some(RouteError::DuplicateName {
                name: b.to_string(),
            });
        }
    }

    let keys = pattern_keys(existing.uri());
    if !pattern_keys(candidate.uri()).iter().any(|key| keys.contains(key)) {
        return None;
    }

    candidate
        .verbs()
        .iter()
        .find(|verb| existing.verbs().contains(*verb))
        .map(|verb| RouteError::DuplicateRoute {
            method: verb.to_string(),
            uri: candidate.uri().to_string(),
        })
}

fn pattern_key(uri: &str) -> String {
    placeholder_regex()
        .replace_all(&normalize_uri(uri), "{}")
        .into_owned()
}

/// Keys of every path `uri` answers: a trailing `{param?}` also answers
/// without its last segment.
fn pattern_keys(uri: &str) -> Vec<String> {
    let key = pattern_key(uri);
    if !has_optional_tail(uri) {
        return vec![key];
    }

    let without = key
        .rsplit_once('/')
        .map(|(head, _)| head.to_string())
        .unwrap_or_default();
    vec![without, key]
}
