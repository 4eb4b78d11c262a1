//! The host router contract.
//!
//! Every operation the localizing facade needs from the underlying router is
//! listed here; nothing is forwarded implicitly.

use crate::error::RouteResult;
use crate::routing::action::{Action, Verb};
use crate::routing::route::Route;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A router able to register routes.
pub trait Registrar {
    type Handler: Clone;

    /// Register a route answering `verbs` at `uri`.
    fn add_route(
        &mut self,
        verbs: &[Verb],
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>>;

    fn get(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&[Verb::Get], uri, action)
    }

    fn post(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&[Verb::Post], uri, action)
    }

    fn put(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&[Verb::Put], uri, action)
    }

    fn patch(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&[Verb::Patch], uri, action)
    }

    fn delete(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&[Verb::Delete], uri, action)
    }

    fn options(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&[Verb::Options], uri, action)
    }

    fn any(
        &mut self,
        uri: &str,
        action: Action<Self::Handler>,
    ) -> RouteResult<&mut Route<Self::Handler>> {
        self.add_route(&Verb::ALL, uri, action)
    }

    /// Register the conventional resource routes.
    ///
    /// Routes are named `<name>.<action>` and live under `uri`:
    /// `uri`, `uri/create`, `uri/{param}` and `uri/{param}/edit`. Actions
    /// without a handler in `resource` are skipped.
    ///
    /// # Returns
    /// The names of the registered routes, in registration order.
    fn resource(
        &mut self,
        name: &str,
        uri: &str,
        resource: &Resource<Self::Handler>,
        options: &ResourceOptions,
    ) -> RouteResult<Vec<String>> {
        let parameter = options
            .parameter
            .clone()
            .unwrap_or_else(|| resource_parameter(name));

        let mut names = Vec::new();
        for kind in ResourceAction::ALL {
            if !options.includes(kind) {
                continue;
            }
            let Some(handler) = resource.handler(kind) else {
                continue;
            };

            let route_name = format!("{}.{}", name, kind);
            let action = Action::new(handler.clone())
                .named(route_name.clone())
                .middleware(options.middleware.iter().cloned());

            self.add_route(kind.verbs(), &kind.uri(uri, &parameter), action)?;
            names.push(route_name);
        }

        Ok(names)
    }
}

/// The seven conventional actions of a resource controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceAction {
    Index,
    Create,
    Store,
    Show,
    Edit,
    Update,
    Destroy,
}

impl ResourceAction {
    pub const ALL: [ResourceAction; 7] = [
        ResourceAction::Index,
        ResourceAction::Create,
        ResourceAction::Store,
        ResourceAction::Show,
        ResourceAction::Edit,
        ResourceAction::Update,
        ResourceAction::Destroy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Store => "store",
            Self::Show => "show",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }

    pub fn verbs(&self) -> &'static [Verb] {
        match self {
            Self::Index | Self::Create | Self::Show | Self::Edit => &[Verb::Get],
            Self::Store => &[Verb::Post],
            Self::Update => &[Verb::Put, Verb::Patch],
            Self::Destroy => &[Verb::Delete],
        }
    }

    /// URI of this action under the resource base URI.
    pub fn uri(&self, base: &str, parameter: &str) -> String {
        let base = base.trim_matches('/');
        match self {
            Self::Index | Self::Store => base.to_string(),
            Self::Create => format!("{}/create", base),
            Self::Show | Self::Update | Self::Destroy => format!("{}/{{{}}}", base, parameter),
            Self::Edit => format!("{}/{{{}}}/edit", base, parameter),
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handlers of a resource controller, one per action.
#[derive(Debug, Clone)]
pub struct Resource<H> {
    handlers: BTreeMap<ResourceAction, H>,
}

impl<H> Resource<H> {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Build a resource with a handler for every action.
    pub fn from_fn(mut handler: impl FnMut(ResourceAction) -> H) -> Self {
        Self {
            handlers: ResourceAction::ALL
                .into_iter()
                .map(|kind| (kind, handler(kind)))
                .collect(),
        }
    }

    pub fn with(mut self, kind: ResourceAction, handler: H) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn handler(&self, kind: ResourceAction) -> Option<&H> {
        self.handlers.get(&kind)
    }
}

impl<H> Default for Resource<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Options of a resource registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Register only these actions (all when empty)
    pub only: Vec<ResourceAction>,
    pub except: Vec<ResourceAction>,
    /// Route parameter name (defaults to the last segment of the name)
    pub parameter: Option<String>,
    pub middleware: Vec<String>,
}

impl ResourceOptions {
    pub fn only(mut self, actions: &[ResourceAction]) -> Self {
        self.only = actions.to_vec();
        self
    }

    pub fn except(mut self, actions: &[ResourceAction]) -> Self {
        self.except = actions.to_vec();
        self
    }

    pub fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
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

    pub fn includes(&self, kind: ResourceAction) -> bool {
        (self.only.is_empty() || self.only.contains(&kind)) && !self.except.contains(&kind)
    }
}

fn resource_parameter(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).replace('-', "_")
}
