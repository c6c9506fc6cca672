//! Landing page served on `/` and `/index`.

use std::path::Path;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::plugin::PluginContext;

/// Paths answering with the landing page.
pub const LANDING_PATHS: [&str; 2] = ["/", "/index"];

/// Page used when no index file is present on disk.
const BUILTIN_PAGE: &str = "<!DOCTYPE html>\n\
<html>\n\
<head><meta charset=\"utf-8\"><title>plugin-host</title></head>\n\
<body><h1>plugin-host</h1><p>No index page configured.</p></body>\n\
</html>\n";

/// Landing page HTML, read once at startup.
#[derive(Debug, Clone)]
pub struct LandingPage {
    html: Bytes,
}

impl LandingPage {
    /// Read the page from disk, falling back to the built-in page.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(html) => {
                tracing::debug!(path = %path.display(), bytes = html.len(), "Landing page loaded");
                Self { html: Bytes::from(html) }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Landing page not readable, serving built-in page"
                );
                Self::builtin()
            }
        }
    }

    pub fn from_html(html: impl Into<Bytes>) -> Self {
        Self { html: html.into() }
    }

    pub fn builtin() -> Self {
        Self::from_html(BUILTIN_PAGE)
    }

    pub fn html(&self) -> &Bytes {
        &self.html
    }
}

/// Install the landing page routes as core routes.
pub fn register(context: &mut PluginContext, page: LandingPage) {
    for path in LANDING_PATHS {
        context.insert_core_route(path, get(landing).with_state(page.clone()));
    }
}

async fn landing(State(page): State<LandingPage>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        page.html.clone(),
    )
}
