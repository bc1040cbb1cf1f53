//! waypoint demo server.
//!
//! ```text
//! GET  /                      home
//! GET  /posts/                list posts        (named "list-posts")
//! POST /posts/                create a post     (named "create-post")
//! GET  /posts/{id}            get a post        (named "get-post")
//! DEL  /posts/{id}            delete a post     (named "delete-post")
//! GET  /admin/dashboard       mounted admin app
//! GET  /named-routes          every named route rendered as JSON
//! ```

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use clap::Parser;
use serde_json::json;

use waypoint::config::{load_config, ServerConfig};
use waypoint::http::context;
use waypoint::lifecycle::startup;
use waypoint::observability::logging;
use waypoint::{with_middleware, with_name, Handler, Middleware, Next, Request, Router};

#[derive(Debug, Parser)]
#[command(name = "waypoint", version, about = "Composable HTTP router demo server")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let _log_level = logging::init(&config.logging)?;
    tracing::info!("waypoint v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_ms = config.middleware.request_timeout_ms,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let router = build_router(&config)?;
    startup::run(&config, router).await?;

    Ok(())
}

fn build_router(config: &ServerConfig) -> waypoint::Result<Router> {
    let mut router = Router::new();
    let stack = startup::middleware_stack(&config.middleware, router.registry().clone())?;
    router.use_middleware(stack);

    router.get("/{$}", text("home"), [with_name("home")])?;

    router.route("/posts", |posts| {
        posts.get("/{$}", text("list posts"), [with_name("list-posts")])?;
        posts.post("/{$}", text("create a new post"), [with_name("create-post")])?;

        posts.group(|group| {
            group.use_middleware([post_id_header()]);
            group.get("/{id}", text("get a post"), [with_name("get-post")])?;
            group.delete("/{id}", text("delete a post"), [with_name("delete-post")])?;
            Ok(())
        })?;
        Ok(())
    })?;

    router.mount("/admin", Handler::new(admin_app()))?;

    router.get(
        "/named-routes",
        Handler::from_fn(named_routes),
        [with_middleware([waypoint::http::middleware::no_cache()])],
    )?;

    Ok(router)
}

fn text(body: &'static str) -> Handler {
    Handler::from_fn(move |_request: Request| async move { body })
}

/// Echo the captured post id as `x-post-id`.
fn post_id_header() -> Middleware {
    Middleware::from_fn(|request: Request, next: Next| async move {
        let id = context::path_param(&request, "id")
            .unwrap_or_default()
            .to_string();
        let mut response = next.run(request).await;
        if let Ok(value) = id.parse() {
            response.headers_mut().insert("x-post-id", value);
        }
        response
    })
}

fn admin_app() -> axum::Router {
    axum::Router::new().route(
        "/dashboard",
        axum::routing::get(|| async { "dashboard" }),
    )
}

async fn named_routes(request: Request) -> axum::response::Response {
    let render = |name: &str, params: &[&str]| -> waypoint::Result<serde_json::Value> {
        let location = context::location(&request, name)?
            .with_path_params(params.iter().copied());
        Ok(json!({
            "name": name,
            "method": location.method().map(|m| m.as_str()),
            "url": location.url()?.to_string(),
        }))
    };

    let routes = [
        ("home", &[][..]),
        ("list-posts", &[][..]),
        ("create-post", &[][..]),
        ("get-post", &["1234"][..]),
        ("delete-post", &["1234"][..]),
    ]
    .into_iter()
    .map(|(name, params)| render(name, params))
    .collect::<waypoint::Result<Vec<_>>>();

    match routes {
        Ok(routes) => Json(json!({ "routes": routes })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render named routes");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
