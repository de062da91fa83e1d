//! Dispatch core: parameter classification and per-request argument
//! resolution.
//!
//! A [`DispatchHandler`] wraps exactly one handler method. At construction it
//! classifies every declared parameter into a fixed [`Slot`]; at request time
//! it resolves each slot into an [`Arg`] from the incoming [`Exchange`] and
//! invokes the handler closure with the resolved argument list.

use crate::exchange::Exchange;
use crate::injector::{Injector, SharedInstance};
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Result returned by handler closures.
pub type HandlerResult = anyhow::Result<Value>;

/// The resolved argument list passed to a handler closure.
pub type Args<'ex> = Vec<Arg<'ex>>;

/// Type-erased handler invocation closure.
pub type HandlerFn = Arc<dyn for<'ex> Fn(Args<'ex>) -> HandlerResult + Send + Sync>;

type Materialize =
    Arc<dyn Fn(&Exchange) -> Result<Box<dyn Any + Send>, serde_json::Error> + Send + Sync>;
type Provide = Arc<dyn Fn(&dyn Injector) -> Option<SharedInstance> + Send + Sync>;

/// Body materializer captured at declaration time for a `body` parameter.
///
/// Carries the declared type's name for diagnostics and a closure that
/// materializes the exchange body as that type.
#[derive(Clone)]
pub struct BodyMaterializer {
    type_name: &'static str,
    materialize: Materialize,
}

/// Declared parameter type captured for the fallback-to-type rule.
///
/// The two framework types ([`Exchange`] and [`Method`]) are recognized by
/// `TypeId` during classification; any other type becomes an injected-type
/// slot whose provider closure resolves it from the configured injector.
#[derive(Clone)]
pub struct DeclaredType {
    type_id: TypeId,
    type_name: &'static str,
    provide: Provide,
}

/// Declaration of one handler parameter.
///
/// A declaration may stack several binding markers; classification picks one
/// strategy by the fixed priority attribute > query > body > path-variable >
/// declared-type fallback. The common case is a single marker built with one
/// of the shorthand constructors.
#[derive(Clone, Default)]
pub struct ParamSpec {
    attrib: Option<Arc<str>>,
    query: Option<Arc<str>>,
    body: Option<BodyMaterializer>,
    path_var: Option<Arc<str>>,
    ty: Option<DeclaredType>,
}

impl ParamSpec {
    /// An empty declaration. Resolves to an unset argument unless markers
    /// are layered on with the `with_*` methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the exchange attribute store under `key`.
    #[must_use]
    pub fn attrib(key: &str) -> Self {
        Self::new().with_attrib(key)
    }

    /// Bind to the query parameter `key`.
    #[must_use]
    pub fn query(key: &str) -> Self {
        Self::new().with_query(key)
    }

    /// Bind to the request body, materialized as `T`.
    #[must_use]
    pub fn body<T: DeserializeOwned + Send + 'static>() -> Self {
        Self::new().with_body::<T>()
    }

    /// Bind to the path variable `key`.
    #[must_use]
    pub fn path_var(key: &str) -> Self {
        Self::new().with_path_var(key)
    }

    /// Declare the parameter type without any binding marker.
    ///
    /// `Exchange` and `http::Method` are recognized as framework types; any
    /// other type is treated as a dependency-injection key.
    #[must_use]
    pub fn of_type<T: Any + Send + Sync>() -> Self {
        Self::new().with_type::<T>()
    }

    /// Shorthand for `of_type::<Exchange>()`.
    #[must_use]
    pub fn exchange() -> Self {
        Self::of_type::<Exchange>()
    }

    /// Shorthand for `of_type::<Method>()`.
    #[must_use]
    pub fn http_method() -> Self {
        Self::of_type::<Method>()
    }

    #[must_use]
    pub fn with_attrib(mut self, key: &str) -> Self {
        self.attrib = Some(Arc::from(key));
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: &str) -> Self {
        self.query = Some(Arc::from(key));
        self
    }

    #[must_use]
    pub fn with_body<T: DeserializeOwned + Send + 'static>(mut self) -> Self {
        self.body = Some(BodyMaterializer {
            type_name: type_name::<T>(),
            materialize: Arc::new(|exchange: &Exchange| {
                exchange
                    .body_as::<T>()
                    .map(|v| Box::new(v) as Box<dyn Any + Send>)
            }),
        });
        self
    }

    #[must_use]
    pub fn with_path_var(mut self, key: &str) -> Self {
        self.path_var = Some(Arc::from(key));
        self
    }

    #[must_use]
    pub fn with_type<T: Any + Send + Sync>(mut self) -> Self {
        self.ty = Some(DeclaredType {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            provide: Arc::new(|injector: &dyn Injector| injector.get_instance(TypeId::of::<T>())),
        });
        self
    }
}

/// Resolution strategy fixed at construction time for one parameter slot.
pub enum Slot {
    /// The exchange object itself.
    Exchange,
    /// The exchange's HTTP method.
    Method,
    /// The request body, materialized as the declared type.
    Body(BodyMaterializer),
    /// Attribute lookup by key; absent keys resolve to no value.
    Attrib(Arc<str>),
    /// Query parameter lookup by key; absent keys resolve to no value.
    Query(Arc<str>),
    /// Path variable lookup by key; absent keys resolve to no value.
    PathVar(Arc<str>),
    /// Resolved from the injector, when one is configured.
    Injected(DeclaredType),
    /// No binding and no declared type; always resolves unset.
    Unbound,
}

impl Slot {
    /// Classify a parameter declaration into its resolution strategy.
    ///
    /// First-match over the fixed priority order; the declared-type fallback
    /// recognizes the two framework types before falling back to injection.
    fn classify(spec: ParamSpec) -> Self {
        if let Some(key) = spec.attrib {
            return Slot::Attrib(key);
        }
        if let Some(key) = spec.query {
            return Slot::Query(key);
        }
        if let Some(materializer) = spec.body {
            return Slot::Body(materializer);
        }
        if let Some(key) = spec.path_var {
            return Slot::PathVar(key);
        }
        match spec.ty {
            Some(ty) if ty.type_id == TypeId::of::<Exchange>() => Slot::Exchange,
            Some(ty) if ty.type_id == TypeId::of::<Method>() => Slot::Method,
            Some(ty) => Slot::Injected(ty),
            None => Slot::Unbound,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Exchange => write!(f, "Exchange"),
            Slot::Method => write!(f, "Method"),
            Slot::Body(m) => write!(f, "Body({})", m.type_name),
            Slot::Attrib(key) => write!(f, "Attrib({key:?})"),
            Slot::Query(key) => write!(f, "Query({key:?})"),
            Slot::PathVar(key) => write!(f, "PathVar({key:?})"),
            Slot::Injected(ty) => write!(f, "Injected({})", ty.type_name),
            Slot::Unbound => write!(f, "Unbound"),
        }
    }
}

/// One resolved argument, produced from a [`Slot`] per request.
pub enum Arg<'ex> {
    /// The exchange itself.
    Exchange(&'ex Exchange),
    /// The request's HTTP method.
    Method(Method),
    /// A query or path-variable value; `None` when the key was absent.
    Text(Option<String>),
    /// An attribute value; `None` when the key was absent.
    Attrib(Option<Value>),
    /// The materialized request body.
    Body(Box<dyn Any + Send>),
    /// An injected instance; `None` when no injector is configured or the
    /// injector does not know the type.
    Instance(Option<SharedInstance>),
    /// No value was produced for this slot.
    Unset,
}

impl<'ex> Arg<'ex> {
    /// The exchange reference, for exchange slots.
    #[must_use]
    pub fn exchange(&self) -> Option<&'ex Exchange> {
        match self {
            Arg::Exchange(exchange) => Some(*exchange),
            _ => None,
        }
    }

    /// The HTTP method, for method slots.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        match self {
            Arg::Method(method) => Some(method),
            _ => None,
        }
    }

    /// The text value of a query or path-variable slot.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Arg::Text(value) => value.as_deref(),
            _ => None,
        }
    }

    /// The attribute value of an attribute slot.
    #[must_use]
    pub fn attrib(&self) -> Option<&Value> {
        match self {
            Arg::Attrib(value) => value.as_ref(),
            _ => None,
        }
    }

    /// Take the materialized body out of a body slot.
    #[must_use]
    pub fn into_body<T: 'static>(self) -> Option<T> {
        match self {
            Arg::Body(body) => body.downcast::<T>().ok().map(|b| *b),
            _ => None,
        }
    }

    /// Borrow the materialized body of a body slot.
    #[must_use]
    pub fn body_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Arg::Body(body) => body.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Downcast the injected instance of an injected-type slot.
    #[must_use]
    pub fn instance<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Arg::Instance(Some(instance)) => Arc::clone(instance).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Whether this slot produced no value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        match self {
            Arg::Unset => true,
            Arg::Text(value) => value.is_none(),
            Arg::Attrib(value) => value.is_none(),
            Arg::Instance(instance) => instance.is_none(),
            _ => false,
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Exchange(_) => write!(f, "Exchange"),
            Arg::Method(method) => write!(f, "Method({method})"),
            Arg::Text(value) => write!(f, "Text({value:?})"),
            Arg::Attrib(value) => write!(f, "Attrib({value:?})"),
            Arg::Body(_) => write!(f, "Body"),
            Arg::Instance(instance) => write!(f, "Instance(present: {})", instance.is_some()),
            Arg::Unset => write!(f, "Unset"),
        }
    }
}

/// Failure surfaced by [`DispatchHandler::handle`].
#[derive(Debug)]
pub enum DispatchError {
    /// The request body could not be materialized as the declared type.
    Body {
        /// Name of the handler whose slot failed.
        handler: String,
        /// The declared parameter type.
        expected: &'static str,
        source: serde_json::Error,
    },
    /// The handler method itself failed.
    Handler {
        handler: String,
        source: anyhow::Error,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Body {
                handler,
                expected,
                source,
            } => write!(
                f,
                "handler '{handler}': request body could not be materialized as {expected}: {source}"
            ),
            DispatchError::Handler { handler, source } => {
                write!(f, "handler '{handler}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Body { source, .. } => Some(source),
            DispatchError::Handler { source, .. } => Some(&**source),
        }
    }
}

/// Per-method dispatch wrapper.
///
/// Constructed once per handler method at bind time and shared, behind an
/// `Arc`, across every route registration of that method. The slot table is
/// immutable after construction, so concurrent `handle` calls need no
/// synchronization.
pub struct DispatchHandler {
    name: Arc<str>,
    slots: Vec<Slot>,
    invoke: HandlerFn,
    injector: Option<Arc<dyn Injector>>,
}

impl DispatchHandler {
    /// Build a dispatch handler from parameter declarations and an
    /// invocation closure, classifying every declaration into its slot.
    pub fn new<F>(
        name: &str,
        params: Vec<ParamSpec>,
        invoke: F,
        injector: Option<Arc<dyn Injector>>,
    ) -> Self
    where
        F: for<'ex> Fn(Args<'ex>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::from_parts(Arc::from(name), params, Arc::new(invoke), injector)
    }

    pub(crate) fn from_parts(
        name: Arc<str>,
        params: Vec<ParamSpec>,
        invoke: HandlerFn,
        injector: Option<Arc<dyn Injector>>,
    ) -> Self {
        let slots: Vec<Slot> = params.into_iter().map(Slot::classify).collect();
        debug!(handler_name = %name, slots = ?slots, "parameter slots classified");
        Self {
            name,
            slots,
            invoke,
            injector,
        }
    }

    /// Name of the wrapped handler method.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The classified slot table, in parameter order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Resolve all arguments from the exchange, invoke the handler, and
    /// return its result.
    ///
    /// Absent attribute/query/path values resolve to unset arguments and the
    /// invocation still proceeds. Body materialization failures abort
    /// resolution; handler failures propagate as [`DispatchError::Handler`].
    pub fn handle(&self, exchange: &Exchange) -> Result<Value, DispatchError> {
        let mut args = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let arg = match slot {
                Slot::Exchange => Arg::Exchange(exchange),
                Slot::Method => Arg::Method(exchange.method().clone()),
                Slot::Body(materializer) => {
                    let body = (materializer.materialize)(exchange).map_err(|source| {
                        error!(
                            handler_name = %self.name,
                            expected = materializer.type_name,
                            error = %source,
                            "body materialization failed"
                        );
                        DispatchError::Body {
                            handler: self.name.to_string(),
                            expected: materializer.type_name,
                            source,
                        }
                    })?;
                    Arg::Body(body)
                }
                Slot::Attrib(key) => Arg::Attrib(exchange.attrib(key).cloned()),
                Slot::Query(key) => Arg::Text(exchange.get_query_param(key).map(str::to_string)),
                Slot::PathVar(key) => Arg::Text(exchange.get_path_param(key).map(str::to_string)),
                Slot::Injected(ty) => Arg::Instance(
                    self.injector
                        .as_deref()
                        .and_then(|injector| (ty.provide)(injector)),
                ),
                Slot::Unbound => Arg::Unset,
            };
            args.push(arg);
        }

        (self.invoke)(args).map_err(|source| {
            error!(handler_name = %self.name, error = %source, "handler invocation failed");
            DispatchError::Handler {
                handler: self.name.to_string(),
                source,
            }
        })
    }
}

impl fmt::Debug for DispatchHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchHandler")
            .field("name", &self.name)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
