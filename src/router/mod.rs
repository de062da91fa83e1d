//! # Router Module
//!
//! The service-side route table. Binding appends immutable
//! [`RouteRegistration`] entries; lookup matches an incoming verb + path and
//! extracts path variables for the exchange.
//!
//! Patterns are compiled to anchored regexes at registration time, so the
//! per-request cost is a linear scan over pre-compiled matchers. Pattern
//! syntax is the `{name}` placeholder form; how placeholders are written is a
//! property of this table, not of the binding layer that composes patterns.

mod core;

pub use core::{RouteMatch, RouteRegistration, Router};
