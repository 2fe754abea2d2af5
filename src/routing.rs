//! Route-name resolution.
//!
//! Every gated endpoint is registered together with its logical route name.
//! The [`RouteTable`] answers "which route is this request?" for the gate and
//! turns a route name back into a path for redirects.

use std::collections::HashMap;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{delete, get, post, put, MethodRouter};
use axum::Router;
use serde::Serialize;

use crate::app::AppState;
use crate::authz::{GatePolicy, RouteClass};

#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub name: &'static str,
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub path: &'static str,
    /// Classification computed when the route was registered
    pub class: RouteClass,
}

fn serialize_method<S: serde::Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    by_path: HashMap<&'static str, HashMap<Method, usize>>,
}

impl RouteTable {
    pub fn insert(&mut self, policy: &GatePolicy, method: Method, path: &'static str, name: &'static str) {
        let entry = RouteEntry {
            name,
            method: method.clone(),
            path,
            class: policy.classify(name),
        };
        self.by_path
            .entry(path)
            .or_default()
            .insert(method, self.entries.len());
        self.entries.push(entry);
    }

    /// Look up the route registered for a matched path template and method.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        // axum answers HEAD with the GET handler
        static GET: Method = Method::GET;
        let method = if method == Method::HEAD { &GET } else { method };
        let index = self.by_path.get(path)?.get(method)?;
        self.entries.get(*index)
    }

    /// Path of the first route registered under `name`, `/{name}` if none.
    pub fn path_for(&self, name: &str) -> String {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.path.to_string())
            .unwrap_or_else(|| format!("/{name}"))
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

/// Builds the router and its [`RouteTable`] side by side.
pub struct RouteRegistry<'a> {
    policy: &'a GatePolicy,
    router: Router<AppState>,
    table: RouteTable,
}

impl<'a> RouteRegistry<'a> {
    pub fn new(policy: &'a GatePolicy) -> Self {
        Self {
            policy,
            router: Router::new(),
            table: RouteTable::default(),
        }
    }

    fn add(mut self, method: Method, path: &'static str, name: &'static str, route: MethodRouter<AppState>) -> Self {
        self.table.insert(self.policy, method, path, name);
        self.router = self.router.route(path, route);
        self
    }

    pub fn get<H, T>(self, path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::GET, path, name, get(handler))
    }

    pub fn post<H, T>(self, path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::POST, path, name, post(handler))
    }

    pub fn put<H, T>(self, path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::PUT, path, name, put(handler))
    }

    pub fn delete<H, T>(self, path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::DELETE, path, name, delete(handler))
    }

    pub fn finish(self) -> (Router<AppState>, RouteTable) {
        (self.router, self.table)
    }
}
