//! Defines the browser's HTTP surface.
//!
//! ## Structure
//! - `GET /healthcheck` — liveness, no store access
//! - `GET {link_prefix}[/{*path}]` — file links from listings; the prefix is
//!   dropped when the rest names an object, otherwise the full path is browsed
//! - `GET /` and `GET /{*path}` — listing for directory paths, object for
//!   file paths (falling back to a listing when no such object exists)
//!
//! HEAD is answered by the same handlers with the body stripped.

use crate::{
    handlers::{
        browse_handlers::{browse, download},
        health_handlers::healthcheck,
    },
    services::browse_service::BrowseService,
};
use axum::{Router, routing::get};

/// Build the router. `link_prefix` is either empty (no download alias) or
/// starts with `/` and has no trailing `/`.
pub fn routes(link_prefix: &str) -> Router<BrowseService> {
    let mut router = Router::new().route("/healthcheck", get(healthcheck));

    if !link_prefix.is_empty() {
        router = router
            .route(link_prefix, get(download))
            .route(&format!("{link_prefix}/"), get(download))
            .route(&format!("{link_prefix}/{{*path}}"), get(download));
    }

    // wildcards never match an empty tail, so the bare roots get their own routes
    router.route("/", get(browse)).route("/{*path}", get(browse))
}
