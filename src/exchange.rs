//! Per-request exchange consumed by the dispatch layer.
//!
//! An [`Exchange`] carries everything a handler may resolve arguments from:
//! the HTTP method, the request path, parsed query parameters, path variables
//! populated at match time, a keyed attribute store, and the JSON request
//! body. The dispatch layer treats it as read-only apart from delegating body
//! materialization to [`Exchange::body_as`].

use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of path/query parameters before heap allocation.
/// Most REST paths carry ≤4 variables; ≤8 stays on the stack.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch hot path.
///
/// Param names use `Arc<str>` because they come from the static route table
/// and are shared across requests; values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// The live per-request context.
///
/// Built by the surrounding server from the raw request, then threaded
/// through route lookup (which fills in path variables) and handler dispatch.
#[derive(Debug, Clone)]
pub struct Exchange {
    method: Method,
    path: String,
    path_params: ParamVec,
    query_params: ParamVec,
    attributes: HashMap<String, Value>,
    body: Option<Value>,
}

impl Exchange {
    /// Create an exchange from a method and a request target.
    ///
    /// The target may carry a query string (`/users?limit=10`); it is split
    /// off and percent-decoded into the query parameter map.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query_params) = match target.split_once('?') {
            Some((path, query)) => {
                let params = url::form_urlencoded::parse(query.as_bytes())
                    .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
                    .collect();
                (path.to_string(), params)
            }
            None => (target.to_string(), ParamVec::new()),
        };
        Self {
            method,
            path,
            path_params: ParamVec::new(),
            query_params,
            attributes: HashMap::new(),
            body: None,
        }
    }

    /// HTTP method of the request.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a path variable by name.
    ///
    /// Uses "last write wins" semantics: if duplicate variable names exist at
    /// different path depths, the deepest occurrence is returned.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name ("last write wins" for duplicates).
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the path variables, as extracted by route lookup.
    pub fn set_path_params(&mut self, params: ParamVec) {
        self.path_params = params;
    }

    /// Replace the query parameters.
    pub fn set_query_params(&mut self, params: ParamVec) {
        self.query_params = params;
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn attrib(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Store an attribute under a key, replacing any previous value.
    pub fn set_attrib(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    /// The parsed JSON request body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Attach the parsed JSON request body.
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// Materialize the request body as `T`.
    ///
    /// A missing body materializes from JSON null, which fails for any type
    /// that does not accept null. Errors propagate to the dispatch layer.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone().unwrap_or(Value::Null))
    }
}
