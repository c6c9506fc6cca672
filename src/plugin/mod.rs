//! Plugin subsystem.
//!
//! # Data Flow
//! ```text
//! PluginRegistry (compiled-in, ordered)
//!     → loader.rs (filter by config, reserved name skipped)
//!     → Plugin::register(&mut PluginScope)
//!     → context.rs (commit on success, discard on failure)
//!     → LoadReport + assembled Router
//! ```
//!
//! # Design Decisions
//! - No global state: the scope is the only way to reach the server
//! - Loading runs once, before the listener accepts connections
//! - One failing plugin never stops its siblings

pub mod context;
pub mod loader;
pub mod registry;
pub mod traits;

pub use context::{LoadedPlugins, PluginContext, PluginScope};
pub use loader::{LoadReport, LoadStatus, PluginLoader, SkipReason, RESERVED_CONTEXT_NAME};
pub use registry::PluginRegistry;
pub use traits::{Plugin, PluginError, PluginInfo};
