//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → pages.rs (`/`, `/index`) | assets.rs (static root) | plugin routes
//!     → response.rs (404 fallback, panic capture)
//!     → Send to client
//! ```

pub mod assets;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use pages::LandingPage;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
