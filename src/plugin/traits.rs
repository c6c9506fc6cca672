//! Plugin traits

use serde::Serialize;
use thiserror::Error;

use crate::plugin::context::PluginScope;

/// Plugin information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Plugin name, unique within a registry
    pub name: String,
    /// Plugin version
    pub version: String,
    /// Plugin description
    pub description: String,
}

impl PluginInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

/// Reasons a plugin fails to load.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin's own registration code reported an error.
    #[error("registration failed: {0}")]
    Registration(String),

    /// A declared route path is not usable.
    #[error("invalid route `{path}`: {reason}")]
    InvalidRoute { path: String, reason: String },

    /// The router rejected the plugin's routes.
    #[error("conflicting routes: {0}")]
    RouteConflict(String),

    /// Another plugin with the same name is already loaded.
    #[error("a plugin named `{0}` is already loaded")]
    Duplicate(String),

    /// Registration panicked.
    #[error("panicked during registration: {0}")]
    Panicked(String),
}

impl PluginError {
    /// Shorthand for [`PluginError::Registration`].
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration(message.into())
    }
}

/// A compiled-in extension that adds routes to the server at startup.
///
/// `register` runs once, before the listener accepts connections. Routes
/// are staged in the scope and only take effect if `register` returns `Ok`.
pub trait Plugin: Send + Sync {
    /// Get plugin information
    fn info(&self) -> PluginInfo;

    /// Register routes against the server.
    fn register(&self, scope: &mut PluginScope) -> Result<(), PluginError>;
}
