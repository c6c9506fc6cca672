//! Plugin loader: walks the registry and registers each plugin, tolerating
//! individual failures.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::config::PluginsConfig;
use crate::observability::metrics;
use crate::plugin::context::{panic_message, PluginContext};
use crate::plugin::registry::PluginRegistry;
use crate::plugin::traits::{PluginError, PluginInfo};

/// Name held by the plugin context itself. Never loaded as a plugin.
pub const RESERVED_CONTEXT_NAME: &str = "context";

/// Why a plugin was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The plugin uses the reserved context name.
    Reserved,
    /// Listed in `plugins.exclude`.
    Excluded,
    /// `plugins.enabled` is set and does not list it.
    NotEnabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Reserved => write!(f, "reserved name"),
            SkipReason::Excluded => write!(f, "excluded by config"),
            SkipReason::NotEnabled => write!(f, "not in enabled list"),
        }
    }
}

/// Outcome of loading one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    Skipped(SkipReason),
    Failed(String),
}

impl LoadStatus {
    fn label(&self) -> &'static str {
        match self {
            LoadStatus::Loaded => "loaded",
            LoadStatus::Skipped(_) => "skipped",
            LoadStatus::Failed(_) => "failed",
        }
    }
}

/// Per-plugin result of a load pass.
#[derive(Debug, Clone)]
pub struct PluginOutcome {
    pub info: PluginInfo,
    pub status: LoadStatus,
}

/// Everything that happened during one load pass, in registry order.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    outcomes: Vec<PluginOutcome>,
}

impl LoadReport {
    pub fn outcomes(&self) -> &[PluginOutcome] {
        &self.outcomes
    }

    pub fn status_of(&self, name: &str) -> Option<&LoadStatus> {
        self.outcomes
            .iter()
            .find(|o| o.info.name == name)
            .map(|o| &o.status)
    }

    pub fn loaded(&self) -> impl Iterator<Item = &PluginInfo> {
        self.outcomes
            .iter()
            .filter(|o| o.status == LoadStatus::Loaded)
            .map(|o| &o.info)
    }

    pub fn failed(&self) -> impl Iterator<Item = &PluginOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, LoadStatus::Failed(_)))
    }
}

/// Loads every plugin in a registry into a [`PluginContext`].
pub struct PluginLoader<'a> {
    config: &'a PluginsConfig,
}

impl<'a> PluginLoader<'a> {
    pub fn new(config: &'a PluginsConfig) -> Self {
        Self { config }
    }

    /// Decide whether a plugin name should be attempted.
    pub fn admits(&self, name: &str) -> Result<(), SkipReason> {
        if name == RESERVED_CONTEXT_NAME {
            return Err(SkipReason::Reserved);
        }
        if self.config.exclude.iter().any(|n| n == name) {
            return Err(SkipReason::Excluded);
        }
        if let Some(enabled) = &self.config.enabled {
            if !enabled.iter().any(|n| n == name) {
                return Err(SkipReason::NotEnabled);
            }
        }
        Ok(())
    }

    /// Register each admitted plugin. A failure is logged and the pass
    /// continues with the next plugin.
    pub fn load(&self, registry: &PluginRegistry, context: &mut PluginContext) -> LoadReport {
        let mut report = LoadReport::default();

        for plugin in registry.iter() {
            let info = plugin.info();

            let status = match self.admits(&info.name) {
                Err(reason) => {
                    tracing::debug!(plugin = %info.name, reason = %reason, "Plugin skipped");
                    LoadStatus::Skipped(reason)
                }
                Ok(()) => {
                    let mut scope = context.scope(&info.name);
                    let registered =
                        panic::catch_unwind(AssertUnwindSafe(|| plugin.register(&mut scope)))
                            .unwrap_or_else(|payload| {
                                Err(PluginError::Panicked(panic_message(payload.as_ref())))
                            });

                    match registered.and_then(|()| context.commit(scope, info.clone())) {
                        Ok(()) => {
                            tracing::info!(
                                plugin = %info.name,
                                version = %info.version,
                                "Plugin loaded"
                            );
                            LoadStatus::Loaded
                        }
                        Err(e) => {
                            tracing::error!(plugin = %info.name, error = %e, "Plugin failed to load");
                            LoadStatus::Failed(e.to_string())
                        }
                    }
                }
            };

            metrics::record_plugin_load(&info.name, status.label());
            report.outcomes.push(PluginOutcome { info, status });
        }

        tracing::info!(
            loaded = report.loaded().count(),
            failed = report.failed().count(),
            total = registry.len(),
            "Plugin loading complete"
        );

        report
    }
}
