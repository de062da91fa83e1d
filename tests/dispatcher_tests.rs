//! Tests for per-method dispatch: slot classification and argument
//! resolution.
//!
//! Dispatch handlers are constructed directly here, bypassing the binder and
//! route table, so each resolution strategy can be exercised in isolation:
//! path variables, query parameters, attributes, body materialization,
//! framework types, injection, and failure propagation.

mod common;
mod tracing_util;

use common::{exchange, exchange_with_body, exchange_with_path_params, NewPet};
use http::Method;
use routebind::{DispatchError, DispatchHandler, InstanceRegistry, ParamSpec};
use serde_json::json;
use std::sync::Arc;
use tracing_util::TestTracing;

#[derive(Debug)]
struct Greeting(String);

#[test]
fn test_path_var_resolves_from_exchange() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "get_pet",
        vec![ParamSpec::path_var("id")],
        |args| Ok(json!({ "id": args[0].text() })),
        None,
    );

    let ex = exchange_with_path_params(Method::GET, "/pets/42", &[("id", "42")]);
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "id": "42" }));
}

#[test]
fn test_absent_path_var_is_unset_and_invocation_proceeds() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "get_pet",
        vec![ParamSpec::path_var("id")],
        |args| Ok(json!({ "unset": args[0].is_unset() })),
        None,
    );

    let ex = exchange(Method::GET, "/pets");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "unset": true }));
}

#[test]
fn test_query_param_resolution() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "list_pets",
        vec![ParamSpec::query("limit"), ParamSpec::query("offset")],
        |args| Ok(json!({ "limit": args[0].text(), "offset": args[1].text() })),
        None,
    );

    let ex = exchange(Method::GET, "/pets?limit=10");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "limit": "10", "offset": null }));
}

#[test]
fn test_attrib_resolution() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "whoami",
        vec![ParamSpec::attrib("user")],
        |args| Ok(json!({ "user": args[0].attrib() })),
        None,
    );

    let mut ex = exchange(Method::GET, "/whoami");
    ex.set_attrib("user", json!({ "name": "ada" }));
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "user": { "name": "ada" } }));

    let bare = exchange(Method::GET, "/whoami");
    let value = handler.handle(&bare).expect("dispatch");
    assert_eq!(value, json!({ "user": null }));
}

#[test]
fn test_attrib_marker_outranks_query_marker() {
    let _tracing = TestTracing::init();
    // Declaration order must not matter; classification follows the fixed
    // priority attribute > query.
    for spec in [
        ParamSpec::attrib("k").with_query("k"),
        ParamSpec::query("k").with_attrib("k"),
    ] {
        let handler = DispatchHandler::new(
            "priority",
            vec![spec],
            |args| Ok(json!({ "value": args[0].attrib() })),
            None,
        );
        let mut ex = exchange(Method::GET, "/priority?k=from_query");
        ex.set_attrib("k", json!("from_attrib"));
        let value = handler.handle(&ex).expect("dispatch");
        assert_eq!(value, json!({ "value": "from_attrib" }));
    }
}

#[test]
fn test_body_materializes_as_declared_type() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "add_pet",
        vec![ParamSpec::body::<NewPet>()],
        |mut args| {
            let pet = args
                .remove(0)
                .into_body::<NewPet>()
                .ok_or_else(|| anyhow::anyhow!("missing body argument"))?;
            Ok(json!({ "name": pet.name, "species": pet.species }))
        },
        None,
    );

    let ex = exchange_with_body(
        Method::POST,
        "/pets",
        json!({ "name": "Rex", "species": "dog" }),
    );
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "name": "Rex", "species": "dog" }));
}

#[test]
fn test_body_materialization_failure_propagates() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "add_pet",
        vec![ParamSpec::body::<NewPet>()],
        |_args| Ok(json!({ "reached": true })),
        None,
    );

    // Missing field: cannot materialize as NewPet.
    let ex = exchange_with_body(Method::POST, "/pets", json!({ "name": "Rex" }));
    let err = handler.handle(&ex).expect_err("materialization must fail");
    assert!(matches!(err, DispatchError::Body { .. }));

    // Missing body entirely fails the same way.
    let ex = exchange(Method::POST, "/pets");
    let err = handler.handle(&ex).expect_err("materialization must fail");
    assert!(matches!(err, DispatchError::Body { .. }));
}

#[test]
fn test_exchange_slot_receives_the_exchange() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "introspect",
        vec![ParamSpec::exchange()],
        |args| {
            let ex = args[0]
                .exchange()
                .ok_or_else(|| anyhow::anyhow!("missing exchange argument"))?;
            Ok(json!({ "path": ex.path() }))
        },
        None,
    );

    let ex = exchange(Method::GET, "/introspect?x=1");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "path": "/introspect" }));
}

#[test]
fn test_method_slot_never_resolves_from_injector() {
    let _tracing = TestTracing::init();
    let mut registry = InstanceRegistry::new();
    registry.provide(Method::DELETE);

    let handler = DispatchHandler::new(
        "which_method",
        vec![ParamSpec::http_method()],
        |args| Ok(json!({ "method": args[0].method().map(|m| m.as_str()) })),
        Some(Arc::new(registry)),
    );

    let ex = exchange(Method::GET, "/which_method");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "method": "GET" }));
}

#[test]
fn test_injected_type_without_injector_is_unset() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "greet",
        vec![ParamSpec::of_type::<Greeting>()],
        |args| Ok(json!({ "unset": args[0].is_unset() })),
        None,
    );

    let ex = exchange(Method::GET, "/greet");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "unset": true }));
}

#[test]
fn test_injected_type_resolves_from_injector() {
    let _tracing = TestTracing::init();
    let mut registry = InstanceRegistry::new();
    registry.provide(Greeting("hello".to_string()));
    assert!(registry.get::<Greeting>().is_some());

    let handler = DispatchHandler::new(
        "greet",
        vec![ParamSpec::of_type::<Greeting>()],
        |args| {
            let greeting = args[0]
                .instance::<Greeting>()
                .ok_or_else(|| anyhow::anyhow!("missing instance"))?;
            Ok(json!({ "greeting": greeting.0 }))
        },
        Some(Arc::new(registry)),
    );

    let ex = exchange(Method::GET, "/greet");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "greeting": "hello" }));
}

#[test]
fn test_handler_failure_propagates() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "explode",
        Vec::new(),
        |_args| Err(anyhow::anyhow!("boom")),
        None,
    );

    let ex = exchange(Method::GET, "/explode");
    let err = handler.handle(&ex).expect_err("handler failure must surface");
    match &err {
        DispatchError::Handler { handler, .. } => assert_eq!(handler, "explode"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("boom"));
}

#[test]
fn test_empty_declaration_resolves_unset() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "blank",
        vec![ParamSpec::new()],
        |args| Ok(json!({ "unset": args[0].is_unset() })),
        None,
    );

    let ex = exchange(Method::GET, "/blank");
    let value = handler.handle(&ex).expect("dispatch");
    assert_eq!(value, json!({ "unset": true }));
}

#[test]
fn test_classification_is_fixed_at_construction() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "classified",
        vec![
            ParamSpec::attrib("a").with_path_var("p"),
            ParamSpec::exchange(),
            ParamSpec::new(),
        ],
        |_args| Ok(json!(null)),
        None,
    );

    let slots: Vec<String> = handler.slots().iter().map(|s| format!("{s:?}")).collect();
    assert_eq!(slots, vec!["Attrib(\"a\")", "Exchange", "Unbound"]);
}

#[test]
fn test_resolution_is_per_invocation() {
    let _tracing = TestTracing::init();
    let handler = DispatchHandler::new(
        "echo_id",
        vec![ParamSpec::path_var("id")],
        |args| Ok(json!(args[0].text())),
        None,
    );

    for id in ["1", "2", "3"] {
        let ex = exchange_with_path_params(Method::GET, "/items/x", &[("id", id)]);
        assert_eq!(handler.handle(&ex).expect("dispatch"), json!(id));
    }
}
