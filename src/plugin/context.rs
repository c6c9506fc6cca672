//! Plugin context and per-plugin registration scopes.
//!
//! # Data Flow
//! ```text
//! PluginContext (route table, config)
//!     → scope(name)       fresh PluginScope handed to Plugin::register
//!     → commit(scope)     trial-assemble router; keep routes on success
//!     → finish()          publish loaded plugins, build final Router
//! ```
//!
//! # Design Decisions
//! - Handlers on one path for disjoint methods are merged
//! - When methods overlap, the later registration replaces the earlier one
//! - A scope that fails to commit leaves the route table untouched
//! - The static mount is reserved and cannot be claimed by plugins

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use axum::routing::MethodRouter;
use axum::Router;

use crate::config::ServerConfig;
use crate::http::{assets, response};
use crate::plugin::traits::{PluginError, PluginInfo};

/// Owner recorded for routes installed by the server itself.
pub const CORE_OWNER: &str = "core";

/// Plugins that loaded successfully, published once loading is complete.
///
/// Handed out to plugins during registration so request handlers can read
/// the final list at request time.
#[derive(Debug, Default)]
pub struct LoadedPlugins {
    inner: OnceLock<Vec<PluginInfo>>,
}

impl LoadedPlugins {
    /// Loaded plugins in load order. Empty until loading has finished.
    pub fn list(&self) -> &[PluginInfo] {
        self.inner.get().map(Vec::as_slice).unwrap_or(&[])
    }

    fn publish(&self, plugins: Vec<PluginInfo>) {
        if self.inner.set(plugins).is_err() {
            tracing::warn!("Loaded plugin list already published");
        }
    }
}

#[derive(Clone)]
struct RouteEntry {
    path: String,
    owners: Vec<String>,
    handler: MethodRouter,
}

/// Routes a single plugin stages during registration.
pub struct PluginScope {
    plugin: String,
    config: Arc<ServerConfig>,
    loaded: Arc<LoadedPlugins>,
    routes: Vec<(String, MethodRouter)>,
}

impl PluginScope {
    /// Name of the plugin this scope belongs to.
    pub fn plugin_name(&self) -> &str {
        &self.plugin
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Secret for signing session cookies.
    pub fn secret_key(&self) -> &str {
        &self.config.session.secret_key
    }

    /// Handle to the list of plugins that end up loaded.
    pub fn loaded_plugins(&self) -> Arc<LoadedPlugins> {
        self.loaded.clone()
    }

    /// Stage a route. Registering the same path twice merges the handlers
    /// when their methods are disjoint and keeps the later one otherwise.
    pub fn route(&mut self, path: &str, handler: MethodRouter) -> Result<(), PluginError> {
        self.check_path(path)?;

        if let Some(slot) = self.routes.iter_mut().find(|(p, _)| p == path) {
            slot.1 = merge_disjoint(&slot.1, &handler).unwrap_or(handler);
        } else {
            self.routes.push((path.to_string(), handler));
        }
        Ok(())
    }

    /// Paths staged so far.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    fn check_path(&self, path: &str) -> Result<(), PluginError> {
        let invalid = |reason: &str| PluginError::InvalidRoute {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if !path.starts_with('/') {
            return Err(invalid("path must start with `/`"));
        }

        let prefix = self.config.pages.static_url_path.as_str();
        let under_prefix = path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if under_prefix {
            return Err(invalid("path is reserved for static assets"));
        }

        panic::catch_unwind(AssertUnwindSafe(|| {
            Router::<()>::new().route(path, MethodRouter::new())
        }))
        .map(|_router| ())
        .map_err(|payload| invalid(&panic_message(payload.as_ref())))
    }
}

/// The explicit handle plugins register through.
pub struct PluginContext {
    config: Arc<ServerConfig>,
    loaded: Arc<LoadedPlugins>,
    routes: Vec<RouteEntry>,
    plugins: Vec<PluginInfo>,
}

impl PluginContext {
    /// Create a context with an empty route table.
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            loaded: Arc::new(LoadedPlugins::default()),
            routes: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Whether a plugin with this name has been committed.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }

    /// Install a route owned by the server itself.
    pub fn insert_core_route(&mut self, path: &str, handler: MethodRouter) {
        upsert(&mut self.routes, path, CORE_OWNER, handler);
    }

    /// Open a fresh scope for one plugin.
    pub fn scope(&self, plugin: &str) -> PluginScope {
        PluginScope {
            plugin: plugin.to_string(),
            config: self.config.clone(),
            loaded: self.loaded.clone(),
            routes: Vec::new(),
        }
    }

    /// Make a plugin's staged routes part of the server.
    ///
    /// The combined route table is assembled once as a trial; if the router
    /// rejects it, nothing from the scope is kept.
    pub fn commit(&mut self, scope: PluginScope, info: PluginInfo) -> Result<(), PluginError> {
        if self.is_loaded(&info.name) {
            return Err(PluginError::Duplicate(info.name));
        }

        let mut candidate = self.routes.clone();
        let mut overridden = Vec::new();
        for (path, handler) in scope.routes {
            if let Some(previous) = upsert(&mut candidate, &path, &info.name, handler) {
                overridden.push(previous);
            }
        }

        let config = self.config.clone();
        panic::catch_unwind(AssertUnwindSafe(|| assemble(&candidate, &config)))
            .map(|_router| ())
            .map_err(|payload| PluginError::RouteConflict(panic_message(payload.as_ref())))?;

        for previous in overridden {
            tracing::warn!(
                path = %previous.path,
                previous_owners = ?previous.owners,
                plugin = %info.name,
                "Route overridden by later registration"
            );
        }

        self.routes = candidate;
        self.plugins.push(info);
        Ok(())
    }

    /// Publish the loaded plugin list and build the router.
    pub fn finish(self) -> Router {
        let router = assemble(&self.routes, &self.config);
        self.loaded.publish(self.plugins);
        router
    }
}

/// Add a handler for `path`, returning the entry it replaced.
///
/// Disjoint methods are merged into the existing entry; overlapping methods
/// replace it wholesale.
fn upsert(
    routes: &mut Vec<RouteEntry>,
    path: &str,
    owner: &str,
    handler: MethodRouter,
) -> Option<RouteEntry> {
    let Some(slot) = routes.iter_mut().find(|r| r.path == path) else {
        routes.push(RouteEntry {
            path: path.to_string(),
            owners: vec![owner.to_string()],
            handler,
        });
        return None;
    };

    match merge_disjoint(&slot.handler, &handler) {
        Some(merged) => {
            slot.handler = merged;
            if !slot.owners.iter().any(|o| o == owner) {
                slot.owners.push(owner.to_string());
            }
            None
        }
        None => Some(std::mem::replace(
            slot,
            RouteEntry {
                path: path.to_string(),
                owners: vec![owner.to_string()],
                handler,
            },
        )),
    }
}

/// Combine two handlers for one path. `None` when any method overlaps.
fn merge_disjoint(existing: &MethodRouter, incoming: &MethodRouter) -> Option<MethodRouter> {
    panic::catch_unwind(AssertUnwindSafe(|| existing.clone().merge(incoming.clone()))).ok()
}

fn assemble(routes: &[RouteEntry], config: &ServerConfig) -> Router {
    let mut router = Router::new();
    for entry in routes {
        router = router.route(&entry.path, entry.handler.clone());
    }

    router
        .nest_service(
            &config.pages.static_url_path,
            assets::static_files(&config.pages.static_root),
        )
        .fallback(response::not_found)
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
