//! Static asset serving.
//!
//! Files under the static root are returned byte for byte with a content
//! type guessed from the extension. Missing files, directories and paths
//! escaping the root all answer 404.

use std::path::Path;

use tower_http::services::ServeDir;

/// Service serving files below `root`.
pub fn static_files(root: &Path) -> ServeDir {
    ServeDir::new(root).append_index_html_on_directories(false)
}
