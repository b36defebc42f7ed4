//! Integration tests for the router chain.
//!
//! Builds a small resource tree and routes requests through it end to end:
//! initializer -> resource path match -> method path match -> template
//! push -> endpoint.

use std::sync::Arc;

use tramway_routing::prelude::*;

fn template(s: &str) -> Arc<UriTemplate> {
    Arc::new(UriTemplate::new(s).unwrap())
}

/// Assembles the tree
///
/// ```text
/// /users                   -> list-users
/// /users/{id}              -> get-user
/// /users/{id}/orders       -> (locator)
///     /{orderId}           -> get-order
/// /health                  -> health
/// ```
fn users_stage(provider: SharedContextProvider, settings: &Settings) -> RoutingStage {
    let templates = PushMatchedTemplateRouterBuilder::from_settings(Arc::clone(&provider), settings);
    let push_uri = || Arc::new(PushMatchedUriRouter::new(Arc::clone(&provider))) as SharedRouter;
    let endpoint = |name: &str| Arc::new(EndpointRouter::new(name)) as SharedRouter;

    let users = template("/users");
    let root_method = template("");
    let by_id = template("/{id}");
    let orders_locator = template("/{id}/orders");
    let by_order_id = template("/{orderId}");
    let health = template("/health");

    let orders_methods = PathMatchingRouter::new(
        Arc::clone(&provider),
        [Route::exact(
            Arc::clone(&by_order_id),
            [
                Arc::new(templates.build(Arc::clone(&by_order_id))) as SharedRouter,
                endpoint("get-order"),
            ],
        )],
    );

    let users_methods = PathMatchingRouter::new(
        Arc::clone(&provider),
        [
            Route::exact(
                root_method,
                [
                    Arc::new(templates.build(Arc::clone(&users))) as SharedRouter,
                    endpoint("list-users"),
                ],
            ),
            Route::exact(
                Arc::clone(&by_id),
                [
                    Arc::new(templates.build_with_method(Arc::clone(&users), by_id)) as SharedRouter,
                    endpoint("get-user"),
                ],
            ),
            Route::of(
                Arc::clone(&orders_locator),
                [
                    push_uri(),
                    Arc::new(templates.build_with_method(Arc::clone(&users), orders_locator))
                        as SharedRouter,
                    Arc::new(orders_methods) as SharedRouter,
                ],
            ),
        ],
    );

    let resources = PathMatchingRouter::new(
        Arc::clone(&provider),
        [
            Route::of(users, [push_uri(), Arc::new(users_methods) as SharedRouter]),
            Route::exact(
                Arc::clone(&health),
                [
                    push_uri(),
                    Arc::new(templates.build(health)) as SharedRouter,
                    endpoint("health"),
                ],
            ),
        ],
    );

    let root = MatchResultInitializerRouter::new(
        Arc::clone(&provider),
        settings.decode_path,
        [Arc::new(resources) as SharedRouter],
    );
    RoutingStage::new(Arc::new(root), provider, settings)
}

fn request(path: &str) -> RoutingRequest {
    RoutingRequest::builder().path(path).build()
}

fn ledger(outcome: &RoutingOutcome) -> Vec<String> {
    outcome
        .context()
        .matched_templates()
        .iter()
        .map(|t| t.template().to_string())
        .collect()
}

// ── End-to-end routing ──────────────────────────────────────────────

#[test]
fn test_resource_method() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users")).unwrap();

    assert_eq!(outcome.endpoint(), Some("list-users"));
    assert_eq!(ledger(&outcome), vec!["/users"]);
    assert_eq!(outcome.context().matched_uris(), ["/users"]);
}

#[test]
fn test_sub_resource_method() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users/42")).unwrap();

    assert_eq!(outcome.endpoint(), Some("get-user"));
    assert_eq!(ledger(&outcome), vec!["/users", "/{id}"]);
    assert_eq!(outcome.context().matched_template_path(), "/users/{id}");
    assert_eq!(
        outcome.context().path_parameters().get("id").map(String::as_str),
        Some("42")
    );
}

#[test]
fn test_sub_resource_locator_accumulates_three_levels() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users/7/orders/9")).unwrap();

    assert_eq!(outcome.endpoint(), Some("get-order"));
    assert_eq!(ledger(&outcome), vec!["/users", "/{id}/orders", "/{orderId}"]);
    assert_eq!(
        outcome.context().matched_template_path(),
        "/users/{id}/orders/{orderId}"
    );
    assert_eq!(outcome.context().matched_uris(), ["/users", "/users/7/orders"]);

    let parameters = outcome.context().path_parameters();
    assert_eq!(parameters.get("id").map(String::as_str), Some("7"));
    assert_eq!(parameters.get("orderId").map(String::as_str), Some("9"));
}

#[test]
fn test_trailing_slash_matches_resource_method() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users/")).unwrap();
    assert_eq!(outcome.endpoint(), Some("list-users"));
}

#[test]
fn test_second_resource() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/health")).unwrap();
    assert_eq!(outcome.endpoint(), Some("health"));
    assert_eq!(ledger(&outcome), vec!["/health"]);
}

#[test]
fn test_request_is_returned_unchanged() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage
        .route(
            RoutingRequest::builder()
                .method(http::Method::POST)
                .path("/users/42")
                .query_string("expand=orders")
                .header("accept", "application/json")
                .build(),
        )
        .unwrap();

    let request = outcome.request();
    assert_eq!(*request.method(), http::Method::POST);
    assert_eq!(request.path(), "/users/42");
    assert_eq!(request.query_string(), "expand=orders");
    assert_eq!(request.headers()["accept"], "application/json");
}

#[test]
fn test_percent_encoded_parameter_is_decoded() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users/jane%20doe")).unwrap();
    assert_eq!(
        outcome.context().path_parameters().get("id").map(String::as_str),
        Some("jane doe")
    );
}

#[test]
fn test_percent_encoded_newline_is_routed() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users/a%0Ab")).unwrap();
    assert_eq!(outcome.endpoint(), Some("get-user"));
    assert_eq!(
        outcome.context().path_parameters().get("id").map(String::as_str),
        Some("a\nb")
    );
}

// ── Failures ────────────────────────────────────────────────────────

#[test]
fn test_unknown_path_is_not_found() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());

    let outcome = stage.route(request("/orders")).unwrap();
    assert!(outcome.endpoint().is_none());
    assert!(outcome.context().matched_templates().is_empty());

    let err = outcome.require_endpoint().unwrap_err();
    assert!(matches!(err, RoutingError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_unmatched_method_leaves_no_template() {
    let stage = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let outcome = stage.route(request("/users/7/invoices")).unwrap();

    assert!(outcome.endpoint().is_none());
    assert!(outcome.context().matched_templates().is_empty());
    assert_eq!(outcome.context().matched_uris(), ["/users"]);
}

#[test]
fn test_depth_limit() {
    let settings = Settings {
        max_routing_depth: 3,
        ..Settings::default()
    };
    let stage = users_stage(Arc::new(RequestScopedProvider), &settings);

    // initializer, resource match, method match, then the method's routers
    let err = stage.route(request("/users")).unwrap_err();
    assert!(matches!(err, RoutingError::DepthExceeded { depth: 4, max: 3 }));
}

#[test]
fn test_strict_ordering_accepts_well_formed_tree() {
    let settings = Settings {
        strict_template_ordering: true,
        ..Settings::default()
    };
    let stage = users_stage(Arc::new(RequestScopedProvider), &settings);

    for path in ["/users", "/users/1", "/users/1/orders/2", "/health"] {
        let outcome = stage.route(request(path)).unwrap();
        assert!(outcome.endpoint().is_some(), "{path} should route");
    }
}

#[test]
fn test_strict_ordering_rejects_push_without_match() {
    let settings = Settings {
        strict_template_ordering: true,
        ..Settings::default()
    };
    let provider: SharedContextProvider = Arc::new(RequestScopedProvider);
    let templates = PushMatchedTemplateRouterBuilder::from_settings(Arc::clone(&provider), &settings);
    let root = MatchResultInitializerRouter::new(
        Arc::clone(&provider),
        true,
        [Arc::new(templates.build(template("/users"))) as SharedRouter],
    );
    let stage = RoutingStage::new(Arc::new(root), provider, &settings);

    let err = stage.route(request("/users")).unwrap_err();
    assert!(matches!(err, RoutingError::OrderingViolation(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn test_lenient_ordering_records_push_without_match() {
    let provider: SharedContextProvider = Arc::new(RequestScopedProvider);
    let templates = PushMatchedTemplateRouterBuilder::new(Arc::clone(&provider));
    let root = MatchResultInitializerRouter::new(
        Arc::clone(&provider),
        true,
        [
            Arc::new(templates.build(template("/users"))) as SharedRouter,
            Arc::new(EndpointRouter::new("anything")) as SharedRouter,
        ],
    );
    let stage = RoutingStage::new(Arc::new(root), provider, &Settings::default());

    let outcome = stage.route(request("/elsewhere")).unwrap();
    assert_eq!(ledger(&outcome), vec!["/users"]);
}

// ── Provider behavior ───────────────────────────────────────────────

#[test]
fn test_task_local_provider_routes_like_request_scoped() {
    let request_scoped = users_stage(Arc::new(RequestScopedProvider), &Settings::default());
    let task_local = users_stage(Arc::new(TaskLocalProvider), &Settings::default());

    for path in ["/users", "/users/3", "/users/3/orders/4", "/health", "/nope"] {
        let a = request_scoped.route(request(path)).unwrap();
        let b = task_local.route(request(path)).unwrap();
        assert_eq!(a.endpoint(), b.endpoint(), "{path}");
        assert_eq!(ledger(&a), ledger(&b), "{path}");
    }
}

#[test]
fn test_task_local_router_outside_scope_fails() {
    let router = PushMatchedTemplateRouterBuilder::new(Arc::new(TaskLocalProvider))
        .build(template("/users"));
    let err = router.apply(request("/users")).unwrap_err();
    assert!(matches!(err, RoutingError::ContextUnavailable(_)));
}

#[test]
fn test_sequential_requests_do_not_share_context() {
    let stage = users_stage(Arc::new(TaskLocalProvider), &Settings::default());
    let first = stage.route(request("/users/1")).unwrap();
    let second = stage.route(request("/users")).unwrap();
    assert_eq!(ledger(&first), vec!["/users", "/{id}"]);
    assert_eq!(ledger(&second), vec!["/users"]);
}

// ── Concurrency ─────────────────────────────────────────────────────

fn expected_ledger(path: &str) -> Vec<&'static str> {
    match path {
        "/users" => vec!["/users"],
        "/users/5" => vec!["/users", "/{id}"],
        "/users/5/orders/6" => vec!["/users", "/{id}/orders", "/{orderId}"],
        _ => vec!["/health"],
    }
}

async fn route_concurrently(stage: RoutingStage) {
    let stage = Arc::new(stage);
    let paths = ["/users", "/users/5", "/users/5/orders/6", "/health"];

    let mut handles = Vec::new();
    for i in 0..64 {
        let stage = Arc::clone(&stage);
        let path = paths[i % paths.len()];
        handles.push(tokio::task::spawn_blocking(move || {
            let outcome = stage.route(request(path)).unwrap();
            (path, ledger(&outcome))
        }));
    }

    for handle in handles {
        let (path, ledger) = handle.await.unwrap();
        assert_eq!(ledger, expected_ledger(path), "{path}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_isolated_request_scoped() {
    route_concurrently(users_stage(Arc::new(RequestScopedProvider), &Settings::default())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_isolated_task_local() {
    route_concurrently(users_stage(Arc::new(TaskLocalProvider), &Settings::default())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_task_local_scope_survives_await_points() {
    let provider: SharedContextProvider = Arc::new(TaskLocalProvider);
    let templates = PushMatchedTemplateRouterBuilder::new(Arc::clone(&provider));
    let a = Arc::new(templates.build(template("/a")));
    let b = Arc::new(templates.build(template("/b")));

    let mut handles = Vec::new();
    for i in 0..32 {
        let a = Arc::clone(&a);
        let b = Arc::clone(&b);
        handles.push(tokio::spawn(async move {
            let (result, context) = TaskLocalProvider::scope(RoutingContext::new(), async move {
                a.apply(request("/a"))?;
                tokio::task::yield_now().await;
                if i % 2 == 0 {
                    b.apply(request("/b"))?;
                }
                Ok::<_, RoutingError>(())
            })
            .await;
            result.unwrap();
            (i, context.matched_template_path())
        }));
    }

    for handle in handles {
        let (i, path) = handle.await.unwrap();
        let expected = if i % 2 == 0 { "/a/b" } else { "/a" };
        assert_eq!(path, expected);
    }
}
