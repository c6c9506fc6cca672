//! Liveness endpoint.

use axum::routing::get;
use axum::Json;
use serde_json::{json, Value};

use crate::plugin::{Plugin, PluginError, PluginInfo, PluginScope};

pub const HEALTH_PATH: &str = "/api/health";

/// Serves `GET /api/health`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new("health", env!("CARGO_PKG_VERSION"), "Liveness probe")
    }

    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError> {
        scope.route(HEALTH_PATH, get(health))
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
