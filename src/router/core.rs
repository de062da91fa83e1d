//! Route table and pattern matching.
//!
//! Patterns use `{name}` placeholders (`/users/{id}`); each placeholder is
//! compiled to a `([^/]+)` capture group at registration time. Lookup is a
//! first-match linear scan in registration order, so conflicting double
//! registrations both exist in the table and the earlier one wins.

use crate::dispatcher::DispatchHandler;
use crate::exchange::ParamVec;
use http::Method;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// An immutable (verb, composed pattern, dispatch handler) entry.
///
/// Produced once per prefix × path × verb combination at bind time and never
/// mutated afterwards. The same `Arc<DispatchHandler>` is shared across every
/// registration of one handler method.
#[derive(Debug, Clone)]
pub struct RouteRegistration {
    method: Method,
    pattern: Arc<str>,
    handler: Arc<DispatchHandler>,
}

impl RouteRegistration {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<DispatchHandler> {
        &self.handler
    }
}

/// Result of matching a request path against the route table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched dispatch handler.
    pub handler: Arc<DispatchHandler>,
    /// The pattern that matched.
    pub pattern: Arc<str>,
    /// Path variables extracted from the URL, in pattern order.
    pub path_params: ParamVec,
}

struct CompiledRoute {
    registration: RouteRegistration,
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

/// The service's route table.
///
/// Filled during the single-threaded bind phase; read-only and safe for
/// unsynchronized concurrent lookups afterwards.
#[derive(Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler against a verb + pattern.
    ///
    /// The pattern is compiled here so lookups never pay compilation cost.
    /// Registrations are never deduplicated.
    pub fn add(&mut self, method: Method, pattern: &str, handler: Arc<DispatchHandler>) {
        let (regex, param_names) = Self::pattern_to_regex(pattern);
        debug!(
            method = %method,
            pattern = %pattern,
            handler_name = %handler.name(),
            "route registered"
        );
        self.routes.push(CompiledRoute {
            registration: RouteRegistration {
                method,
                pattern: Arc::from(pattern),
                handler,
            },
            regex,
            param_names,
        });
    }

    /// All registrations, in registration order.
    pub fn registrations(&self) -> impl Iterator<Item = &RouteRegistration> {
        self.routes.iter().map(|r| &r.registration)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match a verb + path against the table.
    ///
    /// Returns the first registration whose verb and pattern match, with the
    /// extracted path variables; `None` when nothing matches.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if route.registration.method != *method {
                continue;
            }
            if let Some(captures) = route.regex.captures(path) {
                let mut path_params = ParamVec::new();
                for (i, name) in route.param_names.iter().enumerate() {
                    if let Some(value) = captures.get(i + 1) {
                        path_params.push((Arc::clone(name), value.as_str().to_string()));
                    }
                }
                debug!(
                    method = %method,
                    path = %path,
                    pattern = %route.registration.pattern,
                    handler_name = %route.registration.handler.name(),
                    "route matched"
                );
                return Some(RouteMatch {
                    handler: Arc::clone(&route.registration.handler),
                    pattern: Arc::clone(&route.registration.pattern),
                    path_params,
                });
            }
        }
        warn!(method = %method, path = %path, "no route matched");
        None
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!(
                "[route] {} {} -> {}",
                route.registration.method,
                route.registration.pattern,
                route.registration.handler.name()
            );
        }
    }

    /// Convert a route pattern to a regex and extract variable names.
    ///
    /// `/users/{id}` becomes `^/users/([^/]+)$` with variables `["id"]`.
    /// The empty pattern (the bare root after composition) matches `/`.
    pub(crate) fn pattern_to_regex(pattern: &str) -> (Regex, Vec<Arc<str>>) {
        if pattern.is_empty() || pattern == "/" {
            return (
                Regex::new(r"^/$").expect("failed to compile route regex"),
                Vec::new(),
            );
        }

        let mut regex = String::with_capacity(pattern.len() + 5);
        regex.push('^');
        let mut param_names = Vec::with_capacity(pattern.matches('{').count());

        for segment in pattern.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let name = segment.trim_start_matches('{').trim_end_matches('}');
                regex.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            } else if !segment.is_empty() {
                regex.push('/');
                regex.push_str(segment);
            }
        }

        regex.push('$');
        let regex = Regex::new(&regex).expect("failed to compile route regex");

        (regex, param_names)
    }
}
