//! Controller declarations: the startup-time route table a controller
//! exposes to the binder.

use crate::dispatcher::{Args, HandlerFn, HandlerResult, ParamSpec};
use http::Method;
use std::sync::Arc;

/// A controller exposing zero or more handler methods.
///
/// Controllers are supplied as `Arc<dyn Controller>`; the binder walks their
/// declarations exactly once and does not own their lifecycle. A controller
/// with no declared prefixes is bound under a single empty prefix.
pub trait Controller: Send + Sync + 'static {
    /// Path prefixes every handler of this controller is registered under.
    fn path_prefixes(&self) -> Vec<String> {
        Vec::new()
    }

    /// The handler declarations of this controller.
    ///
    /// Invocation closures typically capture a clone of `self` to call back
    /// into controller state.
    fn handlers(self: Arc<Self>) -> Vec<HandlerSpec>;
}

/// Declaration of one handler method.
///
/// Carries the handler name (for diagnostics), the (verb, path-fragment)
/// bindings, the ordered parameter declarations, and the invocation closure.
/// A method may bind several verb/path combinations; all of them share one
/// dispatch handler after binding.
pub struct HandlerSpec {
    pub(crate) name: Arc<str>,
    pub(crate) bindings: Vec<(Method, String)>,
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) invoke: HandlerFn,
}

impl HandlerSpec {
    /// Declare a handler with its invocation closure.
    ///
    /// The closure receives the resolved arguments in declaration order.
    pub fn new<F>(name: &str, invoke: F) -> Self
    where
        F: for<'ex> Fn(Args<'ex>) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            bindings: Vec::new(),
            params: Vec::new(),
            invoke: Arc::new(invoke),
        }
    }

    /// Bind this handler to GET under `path`.
    #[must_use]
    pub fn get(self, path: &str) -> Self {
        self.bind(Method::GET, path)
    }

    /// Bind this handler to POST under `path`.
    #[must_use]
    pub fn post(self, path: &str) -> Self {
        self.bind(Method::POST, path)
    }

    /// Bind this handler to PUT under `path`.
    #[must_use]
    pub fn put(self, path: &str) -> Self {
        self.bind(Method::PUT, path)
    }

    /// Bind this handler to DELETE under `path`.
    #[must_use]
    pub fn delete(self, path: &str) -> Self {
        self.bind(Method::DELETE, path)
    }

    fn bind(mut self, method: Method, path: &str) -> Self {
        self.bindings.push((method, path.to_string()));
        self
    }

    /// Append one parameter declaration.
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Name of this handler.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared (verb, path-fragment) bindings.
    #[must_use]
    pub fn bindings(&self) -> &[(Method, String)] {
        &self.bindings
    }
}
