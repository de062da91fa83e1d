#![allow(dead_code)]

use http::Method;
use routebind::{Exchange, ParamVec};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Request body used by dispatcher and service tests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub species: String,
}

/// Build an exchange for a request target.
pub fn exchange(method: Method, target: &str) -> Exchange {
    Exchange::new(method, target)
}

/// Build an exchange with pre-populated path variables, bypassing route
/// lookup the way dispatcher unit tests do.
pub fn exchange_with_path_params(
    method: Method,
    target: &str,
    params: &[(&str, &str)],
) -> Exchange {
    let mut ex = Exchange::new(method, target);
    let mut vec = ParamVec::new();
    for (name, value) in params {
        vec.push((Arc::from(*name), (*value).to_string()));
    }
    ex.set_path_params(vec);
    ex
}

/// Build an exchange carrying a JSON body.
pub fn exchange_with_body(method: Method, target: &str, body: Value) -> Exchange {
    let mut ex = Exchange::new(method, target);
    ex.set_body(body);
    ex
}
