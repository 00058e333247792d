//! Edge route gate: decides, from request cookies alone, whether a page
//! request is served or redirected.

pub mod app;
pub mod context;
pub mod middleware;

pub use app::{build_app, with_edge_gate};
pub use context::SessionContext;
pub use middleware::{EdgeAction, edge_action, edge_gate, snapshot_from_jar};
