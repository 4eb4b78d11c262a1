//! Locale-aware route registration.
//!
//! Every route declared through `LocaleRouter` is registered once per active
//! locale, with a `<locale>.` name prefix, a `<locale>/` URI prefix and the
//! `locale.session:<locale>` middleware. `UrlHelper` generates URLs for the
//! localized routes and `into_axum_router` serves them.

pub mod config;
pub mod error;
pub mod http;
pub mod locale;
pub mod middleware;
pub mod routing;
pub mod transform;
pub mod url;

pub use config::LocaleConfig;
pub use error::{LocaleError, LocaleResult, RouteError, RouteResult};
pub use http::{handler, into_axum_router, HttpHandler};
pub use locale::{Locale, LocaleAttr, SESSION_MIDDLEWARE};
pub use middleware::{session_middleware, CurrentLocale, MiddlewareRegistry};
pub use routing::{
    Action, Attributes, LocaleRouter, LocaleUrls, Registrar, Resource, ResourceAction,
    ResourceOptions, Route, RouteDecorator, RouteTable, Verb,
};
pub use transform::LocaleTransformer;
pub use url::{parameters, Parameters, UrlGenerator, UrlHelper};
