//! Router tree behaviour: ordering, scoping, mounting and named routes.

use axum::http::{Method, StatusCode};

use waypoint::http::context;
use waypoint::http::middleware::locator;
use waypoint::{with_middleware, with_name, Error, Handler, Request, Router};

mod common;
use common::{recording, recording_handler, send, text, Calls};

#[tokio::test]
async fn test_declared_order_is_execution_order() {
    let calls = Calls::default();
    let mut router = Router::new();
    router.use_middleware([recording("A", &calls), recording("B", &calls)]);
    router.use_middleware([recording("C", &calls)]);
    router
        .get(
            "/ordered",
            recording_handler(&calls, "done"),
            [
                with_middleware([recording("D", &calls), recording("E", &calls)]),
                with_middleware([recording("F", &calls)]),
            ],
        )
        .unwrap();

    assert_eq!(
        send(&router, Method::GET, "/ordered").await,
        (StatusCode::OK, "done".into())
    );

    let expected: Vec<String> = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .map(|id| format!("before:{id}"))
        .chain(["handler".to_string()])
        .chain(["F", "E", "D", "C", "B", "A"].iter().map(|id| format!("after:{id}")))
        .collect();
    assert_eq!(*calls.lock().unwrap(), expected);
}

#[tokio::test]
async fn test_order_across_nested_routers_and_groups() {
    let calls = Calls::default();
    let mut root = Router::new();
    root.use_middleware([recording("root", &calls)]);

    let c = calls.clone();
    root.route("/api", move |api| {
        api.use_middleware([recording("api", &c)]);
        api.group(|group| {
            group.use_middleware([recording("group", &c)]);
            group.get(
                "/items",
                recording_handler(&c, "items"),
                [with_middleware([recording("leaf", &c)])],
            )?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    assert_eq!(send(&root, Method::GET, "/api/items").await.1, "items");
    assert_eq!(
        *calls.lock().unwrap(),
        [
            "before:root", "before:api", "before:group", "before:leaf", "handler",
            "after:leaf", "after:group", "after:api", "after:root",
        ]
    );
}

#[tokio::test]
async fn test_group_use_does_not_leak() {
    let calls = Calls::default();
    let router = Router::new();

    let c = calls.clone();
    router
        .group(move |first| {
            first.use_middleware([recording("first", &c)]);
            first.get("/first", text("first"), [])?;
            Ok(())
        })
        .unwrap();
    router
        .group(|second| {
            second.get("/second", text("second"), [])?;
            Ok(())
        })
        .unwrap();
    router.get("/root", text("root"), []).unwrap();

    send(&router, Method::GET, "/second").await;
    send(&router, Method::GET, "/root").await;
    assert!(calls.lock().unwrap().is_empty());

    send(&router, Method::GET, "/first").await;
    assert_eq!(*calls.lock().unwrap(), ["before:first", "after:first"]);
}

#[tokio::test]
async fn test_mount_strips_prefix_inside_node_middlewares() {
    let calls = Calls::default();
    let mut router = Router::new();
    router.use_middleware([recording("node", &calls)]);

    let c = calls.clone();
    let observed = Handler::from_fn(move |request: Request| {
        let c = c.clone();
        async move {
            c.lock().unwrap().push(format!("path:{}", request.uri().path()));
            "mounted"
        }
    });
    router.mount("/admin", observed).unwrap();

    assert_eq!(
        send(&router, Method::GET, "/admin/settings").await.1,
        "mounted"
    );
    assert_eq!(
        *calls.lock().unwrap(),
        ["before:node", "path:/settings", "after:node"]
    );
}

#[tokio::test]
async fn test_mount_axum_router() {
    let router = Router::new();
    let app = axum::Router::new()
        .route("/dashboard", axum::routing::get(|| async { "dashboard" }));
    router.mount("/admin", Handler::new(app)).unwrap();

    assert_eq!(
        send(&router, Method::GET, "/admin/dashboard").await.1,
        "dashboard"
    );
    assert_eq!(
        send(&router, Method::GET, "/admin/missing").await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_named_routes_across_levels() {
    let router = Router::new();
    router
        .route("/level0", |l0| {
            l0.route("/level1", |l1| {
                l1.route("/level2", |l2| {
                    l2.get("/users/{id}", text("user"), [with_name("user")])?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let registry = router.registry();
    assert!(registry.has("user"));

    let location = registry
        .get("user")
        .unwrap()
        .with_path_params(["42"])
        .with_query_param("q", "golang")
        .with_query_param("limit", "10");

    assert_eq!(location.method(), Some(&Method::GET));
    assert_eq!(
        location.url().unwrap().to_string(),
        "/level0/level1/level2/users/42?limit=10&q=golang"
    );
}

#[tokio::test]
async fn test_locator_resolves_from_any_level() {
    let mut router = Router::new();
    router.use_middleware([locator(router.registry().clone())]);

    router
        .route("/posts", |posts| {
            posts.get("/{id}", text("post"), [with_name("get-post")])?;
            posts.get(
                "/{id}/link",
                Handler::from_fn(|request: Request| async move {
                    let id = context::path_param(&request, "id")
                        .unwrap_or_default()
                        .to_string();
                    context::location(&request, "get-post")
                        .and_then(|location| location.with_path_params([id]).url())
                        .map(|uri| uri.to_string())
                        .unwrap_or_else(|e| e.to_string())
                }),
                [],
            )?;
            Ok(())
        })
        .unwrap();

    assert_eq!(
        send(&router, Method::GET, "/posts/7/link").await.1,
        "/posts/7"
    );
}

#[test]
fn test_duplicate_names_are_per_node() {
    let router = Router::new();
    router.get("/a", text("a"), [with_name("index")]).unwrap();

    let err = router.get("/b", text("b"), [with_name("index")]).unwrap_err();
    assert!(matches!(err, Error::DuplicateName(name) if name == "index"));

    let child = router.route("/child", |_| Ok(())).unwrap();
    child.get("/", text("child"), [with_name("index")]).unwrap();
}

#[test]
fn test_unknown_name() {
    let router = Router::new();
    let err = router.registry().get("nonexistent").unwrap_err();
    assert!(matches!(err, Error::NotFound(name) if name == "nonexistent"));
}

#[tokio::test]
async fn test_dispatch_misses() {
    let router = Router::new();
    router.get("/only-get", text("ok"), []).unwrap();

    assert_eq!(
        send(&router, Method::GET, "/nope").await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&router, Method::POST, "/only-get").await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}
