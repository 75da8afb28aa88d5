//! The disease records dashboard service.
//!
//! The routes are defined in [`routes`]; each operation lives in its own module.

pub mod ask;
pub mod chart;
pub mod extract;
pub mod health;
pub mod query;
pub mod response;
pub mod routes;
pub mod schema;
pub mod state;
