//! # Binder Module
//!
//! Turns controller declarations into route registrations. [`bind`] walks a
//! controller's handler table once at startup, builds one shared dispatch
//! handler per declaration, and registers it with the service for every
//! combination of declared prefix × (verb, path) binding, composing the full
//! pattern with [`compose_pattern`].
//!
//! Binding surfaces no errors: a malformed declaration shows up as a missing
//! route or as a dispatch-time failure, never at bind time.

mod core;

pub use core::{bind, compose_pattern};
