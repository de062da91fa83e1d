//! Dependency resolution contract for injected handler parameters.
//!
//! The dispatch layer never owns a dependency container; it only consumes the
//! narrow [`Injector`] capability. [`InstanceRegistry`] is a minimal
//! type-keyed implementation so services can wire shared instances without an
//! external container.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// A shared, type-erased instance produced by an injector.
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// Resolves shared instances by type.
///
/// Absence is a valid outcome: a resolver that does not know the requested
/// type returns `None` and the corresponding handler argument stays unset.
pub trait Injector: Send + Sync {
    /// Resolve an instance of the given type, if one is available.
    fn get_instance(&self, ty: TypeId) -> Option<SharedInstance>;
}

/// Type-keyed instance registry.
///
/// Holds at most one instance per type. Registration happens at startup,
/// before the route table is published; lookups afterwards are read-only.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: HashMap<TypeId, SharedInstance>,
}

impl InstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance, replacing any previous instance of the same type.
    pub fn provide<T: Any + Send + Sync>(&mut self, instance: T) {
        self.provide_shared(Arc::new(instance));
    }

    /// Register an already-shared instance.
    pub fn provide_shared<T: Any + Send + Sync>(&mut self, instance: Arc<T>) {
        self.instances.insert(TypeId::of::<T>(), instance);
    }

    /// Resolve a typed instance directly, without going through type erasure.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.instances
            .get(&TypeId::of::<T>())
            .and_then(|i| Arc::clone(i).downcast::<T>().ok())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Injector for InstanceRegistry {
    fn get_instance(&self, ty: TypeId) -> Option<SharedInstance> {
        self.instances.get(&ty).map(Arc::clone)
    }
}
