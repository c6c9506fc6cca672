//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use plugin_host::plugin::{Plugin, PluginError, PluginInfo, PluginScope};
use plugin_host::ServerConfig;

pub const INDEX_HTML: &str = "<!DOCTYPE html><h1>Landing</h1>";
pub const APP_JS: &str = "console.log('hi');\n";
pub const LOGO: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10, 0x00];

/// A temporary site: `static/` assets plus `templates/index.html`.
pub struct TestSite {
    pub dir: TempDir,
    pub config: ServerConfig,
}

pub fn site() -> TestSite {
    let dir = tempfile::tempdir().unwrap();
    let static_root = dir.path().join("static");
    let templates = dir.path().join("templates");
    fs::create_dir_all(static_root.join("css")).unwrap();
    fs::create_dir_all(&templates).unwrap();

    fs::write(static_root.join("app.js"), APP_JS).unwrap();
    fs::write(static_root.join("css/site.css"), "body { margin: 0; }").unwrap();
    fs::write(static_root.join("logo.png"), LOGO).unwrap();
    fs::write(templates.join("index.html"), INDEX_HTML).unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.pages.static_root = static_root;
    config.pages.index_file = templates.join("index.html");

    TestSite { dir, config }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub async fn send(router: &Router, method: Method, uri: &str) -> Reply {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body,
    }
}

pub async fn get_path(router: &Router, uri: &str) -> Reply {
    send(router, Method::GET, uri).await
}

/// Registers one GET route answering with a fixed body.
pub struct RoutePlugin {
    pub name: &'static str,
    pub path: &'static str,
    pub body: &'static str,
}

impl Plugin for RoutePlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(self.name, "0.1.0", "test route")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        let body = self.body;
        scope.route(self.path, get(move || async move { body }))
    }
}

/// Registers one POST route answering with a fixed body.
pub struct PostRoutePlugin {
    pub name: &'static str,
    pub path: &'static str,
    pub body: &'static str,
}

impl Plugin for PostRoutePlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(self.name, "0.1.0", "test post route")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        let body = self.body;
        scope.route(self.path, post(move || async move { body }))
    }
}

/// Stages a route, then reports failure.
pub struct FailingPlugin {
    pub name: &'static str,
    pub path: &'static str,
}

impl Plugin for FailingPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(self.name, "0.1.0", "always fails")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        scope.route(self.path, get(|| async { "should never be served" }))?;
        Err(PluginError::registration("missing dependency"))
    }
}

/// Stages a route, then panics.
pub struct PanickingPlugin {
    pub name: &'static str,
    pub path: &'static str,
}

impl Plugin for PanickingPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(self.name, "0.1.0", "panics")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        scope.route(self.path, get(|| async { "should never be served" }))?;
        panic!("plugin blew up");
    }
}

/// Records what it saw through the scope.
#[derive(Default, Clone)]
pub struct ProbePlugin {
    pub seen: Arc<Mutex<Option<(String, String)>>>,
}

impl Plugin for ProbePlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new("probe", "0.1.0", "records scope contents")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        *self.seen.lock().unwrap() = Some((
            scope.plugin_name().to_string(),
            scope.secret_key().to_string(),
        ));
        Ok(())
    }
}

/// Registers a handler that panics when called.
pub struct ExplodingHandlerPlugin;

async fn explode() -> &'static str {
    panic!("handler exploded")
}

impl Plugin for ExplodingHandlerPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new("exploding", "0.1.0", "handler panics")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        scope.route("/explode", get(explode))
    }
}
