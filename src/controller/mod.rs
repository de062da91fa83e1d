//! # Controller Module
//!
//! The declarative side of route binding. Instead of runtime reflection over
//! annotations, a [`Controller`] exposes an explicit table of
//! [`HandlerSpec`] records at startup: each record names a handler method,
//! its HTTP verb/path bindings, the ordered parameter declarations, and the
//! closure that runs the method.
//!
//! ```rust
//! use routebind::{Controller, HandlerSpec};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct PingController;
//!
//! impl Controller for PingController {
//!     fn handlers(self: Arc<Self>) -> Vec<HandlerSpec> {
//!         vec![HandlerSpec::new("ping", |_args| Ok(json!({"pong": true})))
//!             .get("/ping")]
//!     }
//! }
//! ```

mod core;

pub use core::{Controller, HandlerSpec};
