//! Route registration with locale fan-out.
//!
//! # Architecture
//!
//! - `action`: verbs, route attributes and actions
//! - `route`: a registered route
//! - `registrar`: the host router seam (`Registrar`) and resource routes
//! - `table`: `RouteTable`, the in-memory host router and URL generator
//! - `group`: inherited group attributes
//! - `resolver`: explicit `locale` attributes of routes and groups
//! - `decorator`: localizes routes already registered with a locale
//! - `router`: `LocaleRouter`, the facade registering routes per locale
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_route::{Action, LocaleConfig, LocaleRouter, RouteTable};
//!
//! let config = Arc::new(LocaleConfig::from_codes(&["fr", "en"], true)?);
//! let mut table = RouteTable::new();
//! let mut router = LocaleRouter::new(&mut table, config);
//!
//! // registers fr.route at /fr/test and en.route at /en/test
//! router.get("test", Action::new(handler).named("route"))?;
//! ```

pub mod action;
pub mod decorator;
pub mod group;
pub mod registrar;
pub mod resolver;
pub mod route;
pub mod router;
pub mod table;

pub use action::{Action, Attributes, Verb};
pub use decorator::RouteDecorator;
pub use group::GroupContext;
pub use registrar::{Registrar, Resource, ResourceAction, ResourceOptions};
pub use resolver::ActionLocaleResolver;
pub use route::{Route, RouteSummary};
pub use router::{LocaleRouter, LocaleUrls};
pub use table::RouteTable;
