//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for service behavior.
//!
//! ## Environment Variables
//!
//! - `ROUTEBIND_PRETTY_JSON` - pretty-print response payloads (`1`/`true`).
//!   Default: compact output.
//! - `ROUTEBIND_DUMP_ROUTES` - print the route table to stdout after each
//!   bind call (`1`/`true`). Default: off.
//!
//! ```rust
//! use routebind::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(!config.pretty_json || std::env::var("ROUTEBIND_PRETTY_JSON").is_ok());
//! ```

use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeConfig {
    /// Pretty-print JSON response payloads.
    pub pretty_json: bool,
    /// Dump the route table to stdout after binding.
    pub dump_routes: bool,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        RuntimeConfig {
            pretty_json: flag("ROUTEBIND_PRETTY_JSON"),
            dump_routes: flag("ROUTEBIND_DUMP_ROUTES"),
        }
    }
}

fn flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("True")
    )
}
