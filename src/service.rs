//! The service surface surrounding the binding and dispatch core.
//!
//! [`WebService`] owns the route table and the per-request cycle: match the
//! exchange against the table, hand it to the matched dispatch handler, and
//! turn the outcome - success or failure - into response bytes. The HTTP
//! listener that feeds it exchanges is out of scope; any transport that can
//! build an [`Exchange`] can drive a `WebService`.

use crate::binder;
use crate::controller::Controller;
use crate::dispatcher::DispatchHandler;
use crate::exception::{DefaultExceptionHandler, ExceptionHandler};
use crate::exchange::Exchange;
use crate::injector::Injector;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

/// Route table, dependency resolver, and failure policy for one service.
///
/// Built and bound single-threaded at startup; immutable and safe for
/// concurrent dispatch afterwards.
pub struct WebService {
    router: Router,
    injector: Option<Arc<dyn Injector>>,
    exception_handler: Arc<dyn ExceptionHandler>,
    config: RuntimeConfig,
}

impl Default for WebService {
    fn default() -> Self {
        Self::new()
    }
}

impl WebService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            router: Router::new(),
            injector: None,
            exception_handler: Arc::new(DefaultExceptionHandler),
            config,
        }
    }

    /// Configure the dependency resolver handed to dispatch handlers bound
    /// after this call.
    pub fn set_injector(&mut self, injector: Arc<dyn Injector>) {
        self.injector = Some(injector);
    }

    /// The configured dependency resolver, if any.
    #[must_use]
    pub fn injector(&self) -> Option<Arc<dyn Injector>> {
        self.injector.clone()
    }

    /// Replace the exception handler used for failed dispatches.
    pub fn set_exception_handler(&mut self, handler: Arc<dyn ExceptionHandler>) {
        self.exception_handler = handler;
    }

    /// Bind every handler of `controller` under `global_prefix`.
    pub fn bind(&mut self, global_prefix: &str, controller: Arc<dyn Controller>) {
        binder::bind(self, global_prefix, controller);
        if self.config.dump_routes {
            self.router.dump_routes();
        }
    }

    /// Register a handler against a verb + pattern.
    pub fn route(&mut self, method: Method, pattern: &str, handler: Arc<DispatchHandler>) {
        self.router.add(method, pattern, handler);
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Convert a handler's return value into a wire payload.
    #[must_use]
    pub fn transform_response(&self, value: &Value) -> Vec<u8> {
        let serialized = if self.config.pretty_json {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        match serialized {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "response serialization failed");
                b"null".to_vec()
            }
        }
    }

    /// Run the full per-request cycle for one exchange.
    ///
    /// Matches the exchange against the route table (populating its path
    /// variables), dispatches to the matched handler, and returns the
    /// response bytes. Dispatch failures are routed through the exception
    /// handler; `None` means no route matched.
    #[must_use]
    pub fn dispatch(&self, exchange: &mut Exchange) -> Option<Vec<u8>> {
        let matched = self.router.lookup(exchange.method(), exchange.path())?;
        exchange.set_path_params(matched.path_params);
        match matched.handler.handle(exchange) {
            Ok(value) => Some(self.transform_response(&value)),
            Err(err) => {
                warn!(
                    handler_name = %matched.handler.name(),
                    pattern = %matched.pattern,
                    "dispatch failed, invoking exception handler"
                );
                Some(
                    self.exception_handler
                        .handle_bytes(self, exchange, &err),
                )
            }
        }
    }
}
