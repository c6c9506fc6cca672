//! Plugins that ship with the server.

mod catalog;
mod health;

pub use catalog::CatalogPlugin;
pub use health::HealthPlugin;
