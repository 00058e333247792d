use axum::{Extension, Json, Router, http::Uri, middleware};
use serde::Serialize;

use crate::context::SessionContext;
use crate::middleware::edge_gate;

/// Put the edge gate in front of every route of `router`.
pub fn with_edge_gate(router: Router) -> Router {
    router.layer(middleware::from_fn(edge_gate))
}

#[derive(Debug, Serialize)]
struct PageInfo {
    path: String,
    authenticated: bool,
    role: Option<String>,
}

/// Fallback page: reports the path and cookie snapshot that reached it.
async fn page(uri: Uri, session: Option<Extension<SessionContext>>) -> Json<PageInfo> {
    let snapshot = session.map(|Extension(ctx)| *ctx.snapshot()).unwrap_or_default();
    Json(PageInfo {
        path: uri.path().to_string(),
        authenticated: snapshot.authenticated,
        role: snapshot.role.map(|r| r.as_str().to_string()),
    })
}

/// Stand-alone gate: every path that passes is answered by a JSON page stub.
pub fn build_app() -> Router {
    with_edge_gate(Router::new().fallback(page))
}
