//! Controller-to-route binding.

use crate::controller::{Controller, HandlerSpec};
use crate::dispatcher::DispatchHandler;
use crate::service::WebService;
use std::sync::Arc;
use tracing::{debug, info};

/// Register every handler of `controller` into the service's route table
/// under `global_prefix`.
///
/// Exactly one [`DispatchHandler`] is built per handler declaration and
/// shared across every prefix × verb/path combination it is registered
/// under. Declarations with no verb bindings are skipped. Binding twice
/// double-registers; routing conflicts are the route table's concern, not
/// the binder's.
pub fn bind(service: &mut WebService, global_prefix: &str, controller: Arc<dyn Controller>) {
    let mut prefixes = controller.path_prefixes();
    if prefixes.is_empty() {
        prefixes.push(String::new());
    }
    let injector = service.injector();

    for spec in Arc::clone(&controller).handlers() {
        let HandlerSpec {
            name,
            bindings,
            params,
            invoke,
        } = spec;
        if bindings.is_empty() {
            debug!(handler_name = %name, "declaration has no verb bindings, skipped");
            continue;
        }
        let handler = Arc::new(DispatchHandler::from_parts(
            name,
            params,
            invoke,
            injector.clone(),
        ));
        for prefix in &prefixes {
            for (method, path) in &bindings {
                let pattern = compose_pattern(global_prefix, prefix, path);
                info!(
                    handler_name = %handler.name(),
                    method = %method,
                    pattern = %pattern,
                    "route bound"
                );
                service.route(method.clone(), &pattern, Arc::clone(&handler));
            }
        }
    }
}

/// Compose a route pattern from the global prefix, a controller prefix, and
/// a method path fragment.
///
/// Each stage appends one fragment: a separating slash is inserted unless
/// the fragment already starts with one, and a single trailing slash is
/// stripped after every stage. Empty fragments are skipped, so a controller
/// with no prefix composes to `normalize(global_prefix + path)`. The bare
/// root composes to the empty pattern.
#[must_use]
pub fn compose_pattern(global_prefix: &str, prefix: &str, path: &str) -> String {
    let mut pattern = global_prefix.to_string();
    if pattern.ends_with('/') {
        pattern.pop();
    }
    for fragment in [prefix, path] {
        if fragment.is_empty() {
            continue;
        }
        if !fragment.starts_with('/') {
            pattern.push('/');
        }
        pattern.push_str(fragment);
        if pattern.ends_with('/') {
            pattern.pop();
        }
    }
    pattern
}
