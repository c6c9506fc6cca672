//! Plugin host: a small HTTP server that serves a landing page and static
//! assets, and lets compiled-in plugins register extra routes at startup.
//!
//! # Architecture Overview
//!
//! ```text
//!     config (TOML + CLI)
//!          │
//!          ▼
//!     PluginContext ──scope──▶ Plugin::register   (one scope per plugin,
//!          │                                        committed or discarded)
//!          ▼
//!     Router: /, /index │ /static/* │ plugin routes
//!          │
//!          ▼
//!     middleware: request ID → trace → panic capture → timeout → metrics
//!          │
//!          ▼
//!     axum::serve (graceful shutdown on SIGINT/SIGTERM)
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod plugin;
pub mod plugins;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use plugin::{Plugin, PluginRegistry};
