//! Serve a route table with axum.

use crate::error::{RouteError, RouteResult};
use crate::middleware::MiddlewareRegistry;
use crate::routing::action::Verb;
use crate::routing::route::Route;
use crate::routing::table::RouteTable;
use crate::url::{has_optional_tail, placeholder_regex};
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use futures::future::{BoxFuture, FutureExt};
use regex::Captures;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Type-erased request handler stored in a `RouteTable`.
pub type HttpHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function into an `HttpHandler`.
pub fn handler<F, Fut, T>(f: F) -> HttpHandler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: IntoResponse,
{
    Arc::new(move |request| {
        let response = f(request);
        async move { response.await.into_response() }.boxed()
    })
}

/// Build an axum router serving every route of `table`.
///
/// Route middleware is applied through `middleware`, the first entry of a
/// route's list being the outermost layer. A `TraceLayer` wraps the whole
/// router.
///
/// Routes sharing a pattern share one axum path, named after the first
/// route that registered each placeholder position.
///
/// # Returns
/// * `Err(UnknownMiddleware)` if a route references an unregistered alias
/// * `Err(DuplicateRoute)` if two routes answer the same verb on one path
pub fn into_axum_router(
    table: &RouteTable<HttpHandler>,
    middleware: &MiddlewareRegistry,
) -> RouteResult<Router> {
    let mut paths: BTreeMap<String, (MethodRouter, Vec<Verb>)> = BTreeMap::new();
    let mut names = ParameterNames::new();

    for route in table.routes() {
        for path in axum_paths(route.uri(), &mut names) {
            let endpoint = endpoint(route, middleware)?;
            let merged = match paths.remove(&path) {
                Some((existing, mut verbs)) => {
                    if let Some(verb) = route.verbs().iter().find(|verb| verbs.contains(*verb)) {
                        return Err(RouteError::DuplicateRoute {
                            method: verb.to_string(),
                            uri: route.uri().to_string(),
                        });
                    }
                    verbs.extend_from_slice(route.verbs());
                    (existing.merge(endpoint), verbs)
                }
                None => (endpoint, route.verbs().to_vec()),
            };
            paths.insert(path, merged);
        }
    }

    let mut router = Router::new();
    for (path, (endpoint, _)) in paths {
        debug!("Serving {}", path);
        router = router.route(&path, endpoint);
    }

    Ok(router.layer(TraceLayer::new_for_http()))
}

fn endpoint(route: &Route<HttpHandler>, middleware: &MiddlewareRegistry) -> RouteResult<MethodRouter> {
    let mut endpoint = MethodRouter::new();
    for verb in route.verbs() {
        let handler = Arc::clone(route.handler());
        endpoint = endpoint.on(method_filter(*verb), move |request: Request| {
            let handler = Arc::clone(&handler);
            async move { handler(request).await }
        });
    }

    for token in route.gather_middleware().iter().rev() {
        endpoint = middleware.apply(endpoint, token)?;
    }

    Ok(endpoint)
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Put => MethodFilter::PUT,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Delete => MethodFilter::DELETE,
        Verb::Options => MethodFilter::OPTIONS,
    }
}

/// Parameter name used at each placeholder position, keyed by the
/// placeholder-insensitive path leading to it.
type ParameterNames = BTreeMap<String, String>;

/// axum paths of a route URI.
///
/// `{param}` becomes `:param`, unless another route already named that
/// position, in which case its name is reused. A trailing `{param?}` yields
/// the path with and without its last segment.
fn axum_paths(uri: &str, names: &mut ParameterNames) -> Vec<String> {
    let mut key = String::new();
    let mut segments = Vec::new();

    for segment in uri.split('/').filter(|segment| !segment.is_empty()) {
        let placeholder = placeholder_regex()
            .captures(segment)
            .filter(|caps| &caps[0] == segment);

        match placeholder {
            Some(caps) => {
                key.push_str("/{}");
                let name = names
                    .entry(key.clone())
                    .or_insert_with(|| caps[1].to_string());
                segments.push(format!(":{}", name));
            }
            None => {
                key.push('/');
                key.push_str(segment);
                segments.push(
                    placeholder_regex()
                        .replace_all(segment, |caps: &Captures| format!(":{}", &caps[1]))
                        .into_owned(),
                );
            }
        }
    }

    let path = format!("/{}", segments.join("/"));
    if !has_optional_tail(uri) {
        return vec![path];
    }

    let without = format!("/{}", segments[..segments.len().saturating_sub(1)].join("/"));
    vec![without, path]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::action::Action;
    use crate::routing::registrar::Registrar;

    fn paths(uri: &str) -> Vec<String> {
        axum_paths(uri, &mut ParameterNames::new())
    }

    fn ok() -> HttpHandler {
        handler(|_request: Request| async { "ok" })
    }

    // ==================== Path Tests ====================

    #[test]
    fn test_axum_paths_static() {
        assert_eq!(paths("fr/test"), vec!["/fr/test"]);
        assert_eq!(paths(""), vec!["/"]);
    }

    #[test]
    fn test_axum_paths_parameters() {
        assert_eq!(
            paths("fr/article/{article}/edit"),
            vec!["/fr/article/:article/edit"]
        );
    }

    #[test]
    fn test_axum_paths_optional_tail() {
        assert_eq!(paths("fr/posts/{page?}"), vec!["/fr/posts", "/fr/posts/:page"]);
        assert_eq!(paths("{page?}"), vec!["/", "/:page"]);
    }

    #[test]
    fn test_axum_paths_reuse_parameter_names() {
        let mut names = ParameterNames::new();
        assert_eq!(axum_paths("post/{id}", &mut names), vec!["/post/:id"]);
        assert_eq!(axum_paths("post/{slug}", &mut names), vec!["/post/:id"]);
        assert_eq!(
            axum_paths("post/{slug}/comments/{comment}", &mut names),
            vec!["/post/:id/comments/:comment"]
        );
        assert_eq!(axum_paths("tag/{slug}", &mut names), vec!["/tag/:slug"]);
    }

    // ==================== Router Tests ====================

    #[test]
    fn test_router_with_differently_named_placeholders() {
        let mut table = RouteTable::new();
        table.get("post/{id}", Action::new(ok())).unwrap();
        table.delete("post/{slug}", Action::new(ok())).unwrap();
        table.get("post/{slug}/edit", Action::new(ok())).unwrap();

        assert!(into_axum_router(&table, &MiddlewareRegistry::empty()).is_ok());
    }

    #[test]
    fn test_router_with_optional_tail_and_other_verb() {
        let mut table = RouteTable::new();
        table.post("posts", Action::new(ok())).unwrap();
        table.get("posts/{page?}", Action::new(ok())).unwrap();
        // the table refuses a second GET on the shorter path
        assert!(table.get("posts", Action::new(ok())).is_err());

        assert!(into_axum_router(&table, &MiddlewareRegistry::empty()).is_ok());
    }

    #[test]
    fn test_method_filter() {
        assert_eq!(method_filter(Verb::Get), MethodFilter::GET);
        assert_eq!(method_filter(Verb::Options), MethodFilter::OPTIONS);
    }
}
