//! Lists the plugins that loaded.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Json;

use crate::plugin::{LoadedPlugins, Plugin, PluginError, PluginInfo, PluginScope};

pub const CATALOG_PATH: &str = "/api/plugins";

/// Serves `GET /api/plugins` with the final list of loaded plugins.
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new(
            "catalog",
            env!("CARGO_PKG_VERSION"),
            "Lists loaded plugins",
        )
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        let loaded = scope.loaded_plugins();
        scope.route(CATALOG_PATH, get(list_plugins).with_state(loaded))
    }
}

async fn list_plugins(State(loaded): State<Arc<LoadedPlugins>>) -> Json<Vec<PluginInfo>> {
    Json(loaded.list().to_vec())
}
