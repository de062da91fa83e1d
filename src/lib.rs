//! # routebind
//!
//! **routebind** is a route-binding and request-dispatch layer: it turns
//! declarative controller route tables into live HTTP route registrations,
//! and at request time resolves each handler's declared parameters from the
//! incoming exchange before invoking it.
//!
//! ## Architecture
//!
//! - **[`controller`]** - declarative handler tables: a [`Controller`]
//!   exposes [`HandlerSpec`] records naming each handler, its verb/path
//!   bindings, and its ordered parameter declarations
//! - **[`binder`]** - walks a controller once at startup, builds one shared
//!   dispatch handler per declaration, and registers every prefix × verb ×
//!   path combination with slash-normalized pattern composition
//! - **[`dispatcher`]** - per-method wrappers that classify parameters into
//!   fixed resolution slots at construction and resolve arguments from the
//!   exchange on every call
//! - **[`router`]** - the immutable route table; `{name}` patterns compiled
//!   to regexes at registration time
//! - **[`service`]** - the surrounding-service surface: route registration,
//!   response transformation, and the per-request dispatch cycle
//! - **[`exception`]** - failure-to-response conversion with a non-leaking
//!   default
//! - **[`injector`]** - the dependency-resolution capability consumed by
//!   injected-type parameters
//! - **[`exchange`]** - the per-request context handlers resolve from
//!
//! ## Parameter resolution
//!
//! Each parameter declaration is classified once, at bind time, by
//! first-match over the priority attribute > query > body > path-variable >
//! declared-type. The declared-type fallback recognizes [`Exchange`] and
//! [`http::Method`] as framework types and treats anything else as a
//! dependency-injection key. Absent attribute/query/path values resolve to
//! unset arguments - invocation still proceeds. Body materialization errors
//! and handler failures surface as [`DispatchError`] and are converted into
//! a generic response by the service's exception handler.
//!
//! ## Quick start
//!
//! ```rust
//! use routebind::{Controller, Exchange, HandlerSpec, ParamSpec, WebService};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct UserController;
//!
//! impl Controller for UserController {
//!     fn path_prefixes(&self) -> Vec<String> {
//!         vec!["/users".to_string()]
//!     }
//!
//!     fn handlers(self: Arc<Self>) -> Vec<HandlerSpec> {
//!         vec![HandlerSpec::new("get_user", |args| {
//!             let id = args[0].text().unwrap_or("unknown").to_string();
//!             Ok(json!({ "id": id }))
//!         })
//!         .get("/{id}")
//!         .param(ParamSpec::path_var("id"))]
//!     }
//! }
//!
//! let mut service = WebService::new();
//! service.bind("/api", Arc::new(UserController));
//!
//! let mut exchange = Exchange::new(http::Method::GET, "/api/users/42");
//! let bytes = service.dispatch(&mut exchange).expect("route should match");
//! assert_eq!(bytes, br#"{"id":"42"}"#.to_vec());
//! ```

pub mod binder;
pub mod controller;
pub mod dispatcher;
pub mod exception;
pub mod exchange;
pub mod injector;
pub mod router;
pub mod runtime_config;
pub mod service;

pub use binder::{bind, compose_pattern};
pub use controller::{Controller, HandlerSpec};
pub use dispatcher::{Arg, Args, DispatchError, DispatchHandler, HandlerResult, ParamSpec, Slot};
pub use exception::{DefaultExceptionHandler, ExceptionHandler, INTERNAL_ERROR_MESSAGE};
pub use exchange::{Exchange, ParamVec, MAX_INLINE_PARAMS};
pub use injector::{Injector, InstanceRegistry, SharedInstance};
pub use router::{RouteMatch, RouteRegistration, Router};
pub use runtime_config::RuntimeConfig;
pub use service::WebService;
