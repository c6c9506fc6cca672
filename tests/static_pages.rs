//! Landing page, static assets and error responses.

use axum::http::{header, Method, StatusCode};
use plugin_host::plugin::PluginRegistry;
use plugin_host::HttpServer;

mod common;

use common::ExplodingHandlerPlugin;

fn content_type(reply: &common::Reply) -> &str {
    reply
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_root_and_index_serve_landing_page() {
    let site = common::site();
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    let root = common::get_path(&router, "/").await;
    let index = common::get_path(&router, "/index").await;

    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(index.status, StatusCode::OK);
    assert_eq!(root.text(), common::INDEX_HTML);
    assert_eq!(root.body, index.body);
    assert!(content_type(&root).starts_with("text/html"));
}

#[tokio::test]
async fn test_missing_index_file_serves_builtin_page() {
    let mut site = common::site();
    site.config.pages.index_file = site.dir.path().join("nope.html");
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    let reply = common::get_path(&router, "/").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.text().contains("No index page configured"));
}

#[tokio::test]
async fn test_static_assets_exact_bytes() {
    let site = common::site();
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    let js = common::get_path(&router, "/static/app.js").await;
    assert_eq!(js.status, StatusCode::OK);
    assert_eq!(js.text(), common::APP_JS);
    assert!(content_type(&js).contains("javascript"));

    let css = common::get_path(&router, "/static/css/site.css").await;
    assert_eq!(css.status, StatusCode::OK);
    assert!(content_type(&css).starts_with("text/css"));

    let logo = common::get_path(&router, "/static/logo.png").await;
    assert_eq!(logo.status, StatusCode::OK);
    assert_eq!(logo.body.as_ref(), common::LOGO);
    assert_eq!(content_type(&logo), "image/png");
}

#[tokio::test]
async fn test_absent_assets_are_not_found() {
    let site = common::site();
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    for path in [
        "/static/missing.js",
        "/static/css",
        "/static/../templates/index.html",
        "/nowhere",
    ] {
        let reply = common::get_path(&router, path).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_custom_static_url_path() {
    let mut site = common::site();
    site.config.pages.static_url_path = "/assets".into();
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    assert_eq!(common::get_path(&router, "/assets/app.js").await.status, StatusCode::OK);
    assert_eq!(common::get_path(&router, "/static/app.js").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_verbs_rejected_on_landing_page() {
    let site = common::site();
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    let reply = common::send(&router, Method::POST, "/").await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_header() {
    let site = common::site();
    let router = HttpServer::new(site.config.clone(), &PluginRegistry::new()).router();

    let reply = common::get_path(&router, "/").await;
    let id = reply.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let request = axum::http::Request::builder()
        .uri("/index")
        .header("x-request-id", "client-chosen")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(router, request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "client-chosen");
}

#[tokio::test]
async fn test_handler_panic_is_verbose_in_debug() {
    let mut site = common::site();
    site.config.debug = true;
    let registry = PluginRegistry::new().with(ExplodingHandlerPlugin);
    let router = HttpServer::new(site.config.clone(), &registry).router();

    let reply = common::get_path(&router, "/explode").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.text().contains("handler exploded"));
}

#[tokio::test]
async fn test_handler_panic_is_opaque_without_debug() {
    let mut site = common::site();
    site.config.debug = false;
    let registry = PluginRegistry::new().with(ExplodingHandlerPlugin);
    let router = HttpServer::new(site.config.clone(), &registry).router();

    let reply = common::get_path(&router, "/explode").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!reply.text().contains("handler exploded"));

    // The server keeps answering after a panic.
    assert_eq!(common::get_path(&router, "/").await.status, StatusCode::OK);
}
