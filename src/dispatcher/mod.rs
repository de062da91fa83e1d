//! # Dispatcher Module
//!
//! Per-method dispatch wrappers for routebind. A [`DispatchHandler`] is built
//! once per handler method at bind time; it owns the method's classified
//! parameter slot table and resolves arguments from each incoming exchange
//! before invoking the handler closure.
//!
//! ## Two phases
//!
//! - **Classification** (construction time, once): every [`ParamSpec`]
//!   declaration is turned into a fixed [`Slot`] by first-match over the
//!   priority attribute > query > body > path-variable > declared-type.
//!   The slot table never changes afterwards.
//! - **Resolution** (per request): each slot produces one [`Arg`] from the
//!   exchange, in parameter order, and the handler closure is invoked with
//!   the full argument list.
//!
//! ## Error handling
//!
//! Absent attribute/query/path values are a valid, silent outcome - the
//! argument is unset and invocation proceeds. Body materialization failures
//! and handler failures surface as [`DispatchError`] so the surrounding
//! service can route them to its exception handler.

mod core;

pub use core::{
    Arg, Args, BodyMaterializer, DeclaredType, DispatchError, DispatchHandler, HandlerFn,
    HandlerResult, ParamSpec, Slot,
};
