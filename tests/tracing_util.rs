#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Installs a per-test tracing subscriber; logs show up with
/// `RUST_LOG=routebind=debug cargo test -- --nocapture`.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
