//! SchemeSage server — router and shared state, split from the binary so
//! integration tests can drive the router in-process.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
